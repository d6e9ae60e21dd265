use super::*;

// =============================================================================
// Notice
// =============================================================================

#[test]
fn notice_constructors_set_level() {
    assert_eq!(Notice::success("hi").level, NoticeLevel::Success);
    assert_eq!(Notice::failure("no").level, NoticeLevel::Failure);
}

#[test]
fn notice_display_includes_level_and_message() {
    assert_eq!(Notice::success("Logged in").to_string(), "[ok] Logged in");
    assert_eq!(Notice::failure("bad credentials").to_string(), "[error] bad credentials");
}

// =============================================================================
// ChannelNotifier
// =============================================================================

#[tokio::test]
async fn channel_notifier_delivers_in_order() {
    let (notifier, mut rx) = ChannelNotifier::new();
    notifier.notify(Notice::success("one"));
    notifier.notify(Notice::failure("two"));

    assert_eq!(rx.recv().await, Some(Notice::success("one")));
    assert_eq!(rx.recv().await, Some(Notice::failure("two")));
}

#[test]
fn channel_notifier_ignores_dropped_receiver() {
    let (notifier, rx) = ChannelNotifier::new();
    drop(rx);
    notifier.notify(Notice::success("nobody listening"));
}

#[test]
fn log_notifier_accepts_both_levels() {
    LogNotifier.notify(Notice::success("ok"));
    LogNotifier.notify(Notice::failure("not ok"));
}

// =============================================================================
// NoticeMessages
// =============================================================================

#[test]
fn default_messages_are_english() {
    let messages = NoticeMessages::default();
    assert_eq!(messages.login_succeeded, "Logged in");
    assert_eq!(messages.logout_failed, "Logout failed");
}

#[test]
fn zh_messages_differ_from_default() {
    let zh = NoticeMessages::zh();
    assert_eq!(zh.login_failed, "登录失败");
    assert_ne!(zh, NoticeMessages::default());
}
