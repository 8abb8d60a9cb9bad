//! First-non-empty race over independent lookups.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// One lookup in a race. Resolves to an empty string when it found nothing.
pub type Contender = BoxFuture<'static, String>;

/// Runs every contender on its own task and returns the first non-empty
/// answer.
///
/// Position in `contenders` is precedence: once a winner arrives, answers
/// that finished alongside it are checked and the earliest position wins.
/// Contenders still running are not cancelled; they finish in the
/// background and their answers are dropped.
///
/// Returns `None` when every contender comes back empty.
pub async fn first_non_empty(contenders: Vec<Contender>) -> Option<String> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, String)>();
    for (rank, contender) in contenders.into_iter().enumerate() {
        let tx = tx.clone();
        tokio::spawn(async move {
            let answer = contender.await;
            // Fails only once a winner is chosen and the receiver dropped.
            let _ = tx.send((rank, answer));
        });
    }
    drop(tx);

    let (mut best_rank, mut best) = loop {
        let (rank, answer) = rx.recv().await?;
        if !answer.trim().is_empty() {
            break (rank, answer);
        }
    };

    while let Ok((rank, answer)) = rx.try_recv() {
        if rank < best_rank && !answer.trim().is_empty() {
            best_rank = rank;
            best = answer;
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use futures::FutureExt;

    use super::*;

    fn ready(answer: &str) -> Contender {
        let answer = answer.to_string();
        async move { answer }.boxed()
    }

    fn delayed(answer: &str, millis: u64) -> Contender {
        let answer = answer.to_string();
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            answer
        }
        .boxed()
    }

    #[tokio::test]
    async fn skips_empty_answers() {
        let got = first_non_empty(vec![ready(""), ready("http://x.jpg"), ready("")]).await;
        assert_eq!(got.as_deref(), Some("http://x.jpg"));
    }

    #[tokio::test]
    async fn whitespace_counts_as_empty() {
        let got = first_non_empty(vec![ready("  "), delayed("http://b.jpg", 10)]).await;
        assert_eq!(got.as_deref(), Some("http://b.jpg"));
    }

    #[tokio::test]
    async fn all_empty_is_none() {
        assert!(first_non_empty(vec![ready(""), ready(""), ready("")])
            .await
            .is_none());
    }

    #[tokio::test]
    async fn no_contenders_is_none() {
        assert!(first_non_empty(Vec::new()).await.is_none());
    }

    #[tokio::test]
    async fn faster_answer_beats_higher_precedence() {
        let got = first_non_empty(vec![delayed("http://slow.jpg", 200), ready("http://fast.jpg")])
            .await;
        assert_eq!(got.as_deref(), Some("http://fast.jpg"));
    }

    #[tokio::test]
    async fn precedence_breaks_ties_between_ready_answers() {
        let got = first_non_empty(vec![ready("http://a.jpg"), ready("http://b.jpg")]).await;
        assert_eq!(got.as_deref(), Some("http://a.jpg"));
    }

    #[tokio::test]
    async fn losers_keep_running_after_winner() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let slow: Contender = async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flag.store(true, Ordering::SeqCst);
            "http://late.jpg".to_string()
        }
        .boxed();

        let got = first_non_empty(vec![ready("http://first.jpg"), slow]).await;
        assert_eq!(got.as_deref(), Some("http://first.jpg"));
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(finished.load(Ordering::SeqCst));
    }
}
