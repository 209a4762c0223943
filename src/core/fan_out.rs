use crate::core::{AllowanceRequest, AllowanceResponse, KeyedResponse, Result};
use crate::utils::error::CalcError;
use futures::future::try_join_all;
use std::future::Future;

/// Issues `call` for every request concurrently and waits for all of them.
///
/// Each in-flight call carries its own key, so responses are paired with the
/// request that produced them no matter which order they complete in. The
/// first failure fails the whole batch; calls still in flight are dropped.
pub async fn combine_calls<I, F, Fut>(requests: I, call: F) -> Result<Vec<KeyedResponse>>
where
    I: IntoIterator<Item = AllowanceRequest>,
    F: Fn(AllowanceRequest) -> Fut,
    Fut: Future<Output = Result<AllowanceResponse>>,
{
    let call = &call;
    let in_flight: Vec<_> = requests
        .into_iter()
        .map(|request| async move {
            let key = request.key.clone();
            tracing::debug!("Requesting allowance for {}", key);
            let response = call(request).await?;
            tracing::debug!("Allowance for {}: {}", key, response.max_weight);
            Ok::<_, CalcError>(KeyedResponse { key, response })
        })
        .collect();

    if in_flight.is_empty() {
        return Ok(Vec::new());
    }

    let count = in_flight.len();
    let responses = try_join_all(in_flight).await?;
    tracing::debug!("Collected {} of {} allowance responses", responses.len(), count);

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LookupKey;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn request(group: &str, category: &str) -> AllowanceRequest {
        AllowanceRequest::new(LookupKey::new(group, category))
    }

    #[tokio::test]
    async fn test_combines_api_calls() {
        let requests = vec![
            request("Ducks", "Birds"),
            request("Parrots", "Birds"),
            request("Cows", "Mammals"),
        ];

        let results = combine_calls(requests, |request| async move {
            Ok(AllowanceResponse {
                max_weight: Decimal::from(request.group().len() * 10),
            })
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].key, LookupKey::new("Ducks", "Birds"));
        assert_eq!(results[0].response.max_weight, Decimal::from(50));
        assert_eq!(results[1].key, LookupKey::new("Parrots", "Birds"));
        assert_eq!(results[1].response.max_weight, Decimal::from(70));
        assert_eq!(results[2].key, LookupKey::new("Cows", "Mammals"));
        assert_eq!(results[2].response.max_weight, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_pairs_keys_when_completed_in_reverse() {
        let requests: Vec<AllowanceRequest> = (0..5u64)
            .map(|i| request(&format!("group-{}", i), "cat"))
            .collect();

        // 越早送出的請求越晚完成
        let results = combine_calls(requests, |request| async move {
            let index: u64 = request.group()["group-".len()..].parse().unwrap();
            tokio::time::sleep(Duration::from_millis((5 - index) * 20)).await;
            Ok(AllowanceResponse {
                max_weight: Decimal::from(index),
            })
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 5);
        for keyed in &results {
            let index: u64 = keyed.key.group["group-".len()..].parse().unwrap();
            assert_eq!(keyed.response.max_weight, Decimal::from(index));
        }
    }

    #[tokio::test]
    async fn test_empty_requests_make_no_calls() {
        let calls = AtomicUsize::new(0);

        let results = combine_calls(Vec::<AllowanceRequest>::new(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Ok(AllowanceResponse {
                    max_weight: Decimal::ZERO,
                })
            }
        })
        .await
        .unwrap();

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_calls_run_concurrently() {
        let requests = vec![request("A", "x"), request("B", "y"), request("C", "z")];
        let barrier = tokio::sync::Barrier::new(3);

        // 若呼叫被序列化，第一個呼叫會永遠卡在 barrier
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            combine_calls(requests, |_| {
                let barrier = &barrier;
                async move {
                    barrier.wait().await;
                    Ok(AllowanceResponse {
                        max_weight: Decimal::ONE,
                    })
                }
            }),
        )
        .await;

        let results = outcome.expect("calls were not issued concurrently").unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_single_failure_fails_batch() {
        let requests = vec![request("ok", "x"), request("broken", "y")];

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            combine_calls(requests, |request| async move {
                if request.group() == "broken" {
                    Err(CalcError::lookup(request.group(), request.category(), "boom"))
                } else {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }),
        )
        .await
        .expect("pending call was not cancelled");

        match outcome {
            Err(CalcError::LookupError { group, .. }) => assert_eq!(group, "broken"),
            other => panic!("expected lookup error, got {:?}", other),
        }
    }
}
