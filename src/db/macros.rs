/// Read-through caching for upstream API calls.
///
/// Checks the cache for the given key and returns the cached value on a
/// hit. On a miss the provided block runs, its result is stored under the
/// key, and the result is returned.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`]
/// * `$key`: the [`crate::db::CacheKey`] to look up and store under
/// * `$block`: async block computing the value on a miss
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            // Annotated so blocks ending in a bare `Ok(..)` infer their
            // error type.
            let value: $crate::error::AppResult<_> = $block.await;
            let value = value?;
            $cache.set_in_cache(&$key, &value).await;
            Ok(value)
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::db::{Cache, CacheKey};
    use crate::error::AppResult;
    use std::time::Duration;

    async fn lookup(cache: &Cache, calls: &mut u32) -> AppResult<Vec<String>> {
        cached!(cache, CacheKey::PopularTv { limit: 2 }, async {
            *calls += 1;
            // A bare Ok, as the provider blocks end; the macro must pin
            // the error type on its own.
            Ok(vec!["Heat".to_string(), "Ronin".to_string()])
        })
    }

    #[tokio::test]
    async fn test_cached_computes_once_then_serves_hits() {
        let cache = Cache::new(Duration::from_secs(60));
        let mut calls = 0;

        let first = lookup(&cache, &mut calls).await.unwrap();
        let second = lookup(&cache, &mut calls).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls, 1);
    }
}
