use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::decode("x").to_string().contains("decode error:"));
    assert!(CardError::encode("x").to_string().contains("encode error:"));
    assert!(CardError::render("x").to_string().contains("render error:"));
    assert!(CardError::fetch("x").to_string().contains("fetch error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
