use super::*;

#[test]
fn whitespace_runs_collapse_to_one_underscore() {
    assert_eq!(export_filename("Mathan   Kumar"), "Mathan_Kumar_Memories.png");
    assert_eq!(export_filename("A\t\nB C"), "A_B_C_Memories.png");
}

#[test]
fn edges_and_empty_names() {
    assert_eq!(export_filename(" X "), "_X__Memories.png");
    assert_eq!(export_filename(""), "_Memories.png");
    assert_eq!(export_filename("MATHAN KUMAR"), "MATHAN_KUMAR_Memories.png");
}

#[test]
fn non_ascii_is_preserved() {
    assert_eq!(export_filename("ÉLODIE  Ü"), "ÉLODIE_Ü_Memories.png");
}
