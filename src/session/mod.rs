pub mod card_session;
