use super::*;
use session::ApplicationUserRecord;

fn icon(balance: i32) -> GeneratedIcon {
    GeneratedIcon {
        prompt: "owl".to_owned(),
        format: "png".to_owned(),
        image_base64: "AAAA".to_owned(),
        balance,
    }
}

fn synced(balance: i32) -> SyncStatus {
    SyncStatus::Synced(ApplicationUserRecord {
        id: "u1".to_owned(),
        email: "a@b.com".to_owned(),
        display_name: None,
        balance,
        created_at: 0,
    })
}

#[test]
fn prompt_is_trimmed() {
    assert_eq!(validate_prompt_input("  owl  "), Ok("owl".to_owned()));
}

#[test]
fn blank_prompt_is_rejected() {
    assert_eq!(validate_prompt_input(" \t "), Err("Enter a prompt for your icon."));
}

#[test]
fn prompt_length_is_bounded_in_chars() {
    let at_limit = "é".repeat(MAX_PROMPT_CHARS);
    assert!(validate_prompt_input(&at_limit).is_ok());
    let over = "a".repeat(MAX_PROMPT_CHARS + 1);
    assert_eq!(validate_prompt_input(&over), Err("Keep the prompt under 200 characters."));
}

#[test]
fn last_generation_balance_wins() {
    assert_eq!(displayed_balance(Some(&icon(3)), &synced(5)), Some(3));
    assert_eq!(displayed_balance(None, &synced(5)), Some(5));
    assert_eq!(displayed_balance(None, &SyncStatus::Syncing), None);
}

#[test]
fn styling_needs_a_base_icon() {
    assert_eq!(validate_style_input(None, "owl"), Err("Generate a base image first."));
}

#[test]
fn styling_prompt_is_validated() {
    let base = icon(4);
    assert_eq!(validate_style_input(Some(&base), "  fox "), Ok("fox".to_owned()));
    assert!(validate_style_input(Some(&base), "   ").is_err());
    assert!(validate_style_input(Some(&base), &"a".repeat(MAX_PROMPT_CHARS + 1)).is_err());
}
