//! End-to-end scenarios: a scripted chat feeding the dispatcher, with an
//! in-memory store standing in for the spreadsheet.

mod common;

use common::{build_bot, human_msg, log_msg};

const FULL_LOG: &str = "\u{1F6A8} Elite Honor Guard Self-Deployment Log\n\
    -------------[DEPLOYMENT LOG DATABASE]-------------\n\
    [E://] DEPLOYMENT-LOG >> VIP: Queen | GUARDS: A,B,C | DURATION: 2h | VOUCH: X,Y\n\
    ---------------------------------------------------\n\
    [E://] SUBMITTED BY >> \"Sapphire\"";

#[tokio::test]
async fn strike_creates_then_increments_row() {
    let (dispatcher, chat, store) = build_bot();

    dispatcher.handle_message(human_msg("!strike @alice")).await;
    assert_eq!(
        store.rows("Strikes"),
        vec![vec!["alice".to_string(), "1".to_string()]]
    );
    assert!(chat.sent()[0].1.contains("Total Strikes: 1"));

    dispatcher.handle_message(human_msg("!strike @alice")).await;
    assert_eq!(
        store.rows("Strikes"),
        vec![vec!["alice".to_string(), "2".to_string()]]
    );
    assert!(chat.sent()[1].1.contains("Total Strikes: 2"));
}

#[tokio::test]
async fn deployment_log_is_appended_once_with_no_reply() {
    let (dispatcher, chat, store) = build_bot();

    dispatcher.handle_message(log_msg(FULL_LOG)).await;

    let rows = store.rows("Sheet1");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][..5], ["Queen", "A,B,C", "2h", "X,Y", "Sapphire"]);
    assert!(!rows[0][5].is_empty());
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn malformed_deployment_log_is_dropped_silently() {
    let (dispatcher, chat, store) = build_bot();

    dispatcher
        .handle_message(log_msg("DEPLOYMENT-LOG but nothing else of note"))
        .await;

    assert!(store.rows("Sheet1").is_empty());
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn deployment_log_from_untrusted_author_is_not_ingested() {
    let (dispatcher, chat, store) = build_bot();

    // Same text, wrong author: must not touch the store. The text is also
    // unprefixed, so it is not a command either.
    dispatcher.handle_message(human_msg(FULL_LOG)).await;

    assert!(store.rows("Sheet1").is_empty());
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn handler_failure_yields_one_reply_and_loop_survives() {
    let (dispatcher, chat, store) = build_bot();
    store.fail_all();

    dispatcher.handle_message(human_msg("!strike @alice")).await;

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "error executing this command");

    // The process keeps accepting messages; a command that does not touch
    // the store still works.
    dispatcher.handle_message(human_msg("!health")).await;
    assert_eq!(chat.sent().len(), 2);
    assert_eq!(chat.sent()[1].1, "ok");
}

#[tokio::test]
async fn unrecognized_command_is_silent() {
    let (dispatcher, chat, _store) = build_bot();
    dispatcher
        .handle_message(human_msg("!deployment-log-channel is acting up"))
        .await;
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn longest_alias_wins_over_shorter_names() {
    let (dispatcher, chat, _store) = build_bot();

    dispatcher
        .handle_message(human_msg("!deploystart 0900 alpha"))
        .await;

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("DEPLOYMENT START"));
    assert!(sent[0].1.contains("Time: 0900"));
    assert!(sent[0].1.contains("Team: alpha"));
}

#[tokio::test]
async fn warrant_posts_multi_section_announcement() {
    let (dispatcher, chat, _store) = build_bot();

    dispatcher
        .handle_message(human_msg(
            "!warrant - | The Broker | Smuggling | High | armed;evasive | approach in pairs",
        ))
        .await;

    let sent = chat.sent();
    assert_eq!(sent.len(), 1);
    let text = &sent[0].1;
    assert!(text.starts_with("<@&999>"));
    assert!(text.contains("WARRANT ISSUED"));
    assert!(text.contains("Subject: The Broker"));
    assert!(text.contains("Threat Level: High"));
    assert!(text.contains("- armed"));
    assert!(text.contains("- approach in pairs"));
}

#[tokio::test]
async fn promotion_upserts_and_reports_ranks() {
    let (dispatcher, chat, store) = build_bot();

    dispatcher
        .handle_message(human_msg("!promotion @alice Guard"))
        .await;
    dispatcher
        .handle_message(human_msg("!promotion @alice Captain"))
        .await;

    assert_eq!(
        store.rows("Ranks"),
        vec![vec!["alice".to_string(), "Captain".to_string()]]
    );
    let sent = chat.sent();
    assert!(sent[0].1.contains("New Rank: Guard"));
    assert!(sent[1].1.contains("Previous Rank: Guard | New Rank: Captain"));
}

#[tokio::test]
async fn concurrent_strikes_for_same_user_never_duplicate_rows() {
    let (dispatcher, _chat, store) = build_bot();

    let d1 = std::sync::Arc::clone(&dispatcher);
    let d2 = std::sync::Arc::clone(&dispatcher);
    tokio::join!(
        d1.handle_message(human_msg("!strike @alice")),
        d2.handle_message(human_msg("!strike @alice")),
    );

    let rows = store.rows("Strikes");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], vec!["alice".to_string(), "2".to_string()]);
}
