use anyhow::{Context, Result};
use dialog_display::config::{Config, apply_overrides, load_config};
use dialog_display::model::decode_chats;
use dialog_display::{Chat, ChatPresenter, PresentationError, UserId};

const DIALOG_LIST: &str = r#"[
    {
        "id": 10,
        "is_group": false,
        "name": null,
        "image": null,
        "participants": [
            {"id": 2, "username": "ana", "first_name": "Ana", "last_name": "Lee",
             "gender": "f", "avatar": {"image": "/media/avatars/ana.png"}, "user_group": "teacher"},
            {"id": 1, "username": "ivan", "first_name": "Ivan", "last_name": "Petrov",
             "gender": "m", "avatar": {"image": "/media/avatars/ivan.png"}, "user_group": "student"}
        ]
    },
    {
        "id": 11,
        "is_group": true,
        "name": "Rust course, group 3",
        "image": "https://cdn.school.example/groups/3.png",
        "participants": [
            {"id": 1, "first_name": "Ivan", "last_name": "Petrov", "avatar": null},
            {"id": 2, "first_name": "Ana", "last_name": "Lee", "avatar": null}
        ]
    },
    {
        "id": 12,
        "is_group": false,
        "participants": [
            {"id": 1, "first_name": "Ivan", "last_name": "Petrov", "avatar": null}
        ]
    }
]"#;

fn load_chats() -> Result<Vec<Result<Chat, PresentationError>>> {
    let document: serde_json::Value =
        serde_json::from_str(DIALOG_LIST).context("dialog list should parse")?;
    Ok(decode_chats(document))
}

#[test]
fn dialog_list_is_presented_with_configured_origin() -> Result<()> {
    let dir = std::env::temp_dir().join("dialog_display_it_configured_origin");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        r#"
[display]
base_url = "https://school.example/"
"#,
    )?;

    let config = load_config(&path, true)?;
    let config = apply_overrides(config, None, None)?;
    let presenter = ChatPresenter::from_config(&config.display)?;
    std::fs::remove_dir_all(&dir).ok();

    let chats = load_chats()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .context("every record in the list is well formed")?;
    let results = presenter.present_all(&chats, UserId(1));

    let direct = results[0].as_ref().expect("direct chat should present");
    assert_eq!(direct.id, Some(10));
    assert_eq!(direct.name, "Ana Lee");
    assert_eq!(direct.image, "https://school.example/media/avatars/ana.png");

    let group = results[1].as_ref().expect("group chat should present");
    assert_eq!(group.name, "Rust course, group 3");
    assert_eq!(group.image, "https://cdn.school.example/groups/3.png");

    assert_eq!(
        results[2],
        Err(PresentationError::NoCounterpartFound { chat_id: Some(12) })
    );
    Ok(())
}

#[test]
fn the_other_side_of_a_direct_chat_sees_the_current_user() -> Result<()> {
    let presenter = ChatPresenter::from_config(&Config::default().display)?;
    let chat = load_chats()?.remove(0)?;

    assert_eq!(presenter.resolve_name(&chat, UserId(2))?, "Ivan Petrov");
    assert_eq!(
        presenter.resolve_image(&chat, UserId(2))?,
        "http://127.0.0.1:8000/media/avatars/ivan.png"
    );
    Ok(())
}

#[test]
fn group_without_name_is_rejected_at_the_boundary() {
    let err = decode_chats(serde_json::json!(
        {"id": 20, "is_group": true, "image": "https://cdn/x.png", "participants": []}
    ))
    .remove(0)
    .expect_err("group without a name is malformed");

    assert!(matches!(
        err,
        PresentationError::MalformedChatRecord { chat_id: Some(20), .. }
    ));
}
