use super::*;
use std::time::Duration;

#[tokio::test]
async fn returns_output_when_work_finishes_first() {
    let out = with_deadline(async { 7 }, tokio::time::sleep(Duration::from_secs(5))).await;
    assert_eq!(out, Some(7));
}

#[tokio::test]
async fn returns_none_when_timer_wins() {
    let work = async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        7
    };
    let out = with_deadline(work, tokio::time::sleep(Duration::from_millis(10))).await;
    assert_eq!(out, None);
}

#[tokio::test]
async fn never_resolving_work_is_cut_off() {
    let out = with_deadline(std::future::pending::<u8>(), async {}).await;
    assert!(out.is_none());
}
