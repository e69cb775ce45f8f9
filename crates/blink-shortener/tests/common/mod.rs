//! Store behaviour every backend must share. Each check takes a fresh, empty
//! repository and drives it through [`ShortenerService`].

use std::collections::HashSet;

use blink_core::{Repository, ShortCode, ShortenerError, UrlStore};
use blink_generator::{RandomGenerator, RandomGeneratorSettings, SeqGenerator};
use blink_shortener::ShortenerService;

pub async fn create_resolve_stats<R: Repository>(repository: R) {
    let service = ShortenerService::new(repository, RandomGenerator::default());

    let code = service.create("https://example.com/a").await.unwrap();
    assert_eq!(service.stats(&code).await.unwrap(), 0);

    assert_eq!(
        service.resolve(&code).await.unwrap(),
        "https://example.com/a"
    );
    assert_eq!(service.stats(&code).await.unwrap(), 1);

    service.resolve(&code).await.unwrap();
    assert_eq!(service.stats(&code).await.unwrap(), 2);
    assert_eq!(service.stats(&code).await.unwrap(), 2);
}

pub async fn unknown_code_is_not_found<R: Repository>(repository: R) {
    let service = ShortenerService::new(repository, RandomGenerator::default());
    let missing = ShortCode::new_unchecked("doesnotexist");

    let err = service.resolve(&missing).await.unwrap_err();
    assert!(matches!(err, ShortenerError::NotFound(_)));
    let err = service.stats(&missing).await.unwrap_err();
    assert!(matches!(err, ShortenerError::NotFound(_)));
}

/// Two services with identical sequential generators propose the same
/// candidates; the second must skip past every code the first already owns.
pub async fn conflicting_candidate_is_retried<R: Repository + Clone>(repository: R) {
    let first = ShortenerService::new(repository.clone(), SeqGenerator::with_prefix("bl"));
    let second = ShortenerService::new(repository, SeqGenerator::with_prefix("bl"));

    let a = first.create("https://a.example").await.unwrap();
    let b = second.create("https://b.example").await.unwrap();

    assert_eq!(a.as_str(), "bl000000");
    assert_eq!(b.as_str(), "bl000001");
    assert_eq!(second.resolve(&a).await.unwrap(), "https://a.example");
    assert_eq!(first.resolve(&b).await.unwrap(), "https://b.example");
}

pub async fn racing_creates_get_distinct_codes<R: Repository + Clone>(repository: R) {
    let services: Vec<_> = (0..4)
        .map(|_| {
            ShortenerService::new(repository.clone(), SeqGenerator::with_prefix("bl"))
                .with_max_attempts(64)
        })
        .collect();

    let handles: Vec<_> = services
        .iter()
        .enumerate()
        .flat_map(|(s, service)| {
            (0..8).map(move |i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let url = format!("https://example.com/{s}/{i}");
                    let code = service.create(&url).await.unwrap();
                    (code, url)
                })
            })
        })
        .collect();

    let mut codes = HashSet::new();
    let mut created = Vec::new();
    for handle in handles {
        let (code, url) = handle.await.unwrap();
        assert!(codes.insert(code.clone()), "{code} handed out twice");
        created.push((code, url));
    }
    assert_eq!(codes.len(), 32);

    let reader = &services[0];
    for (code, url) in created {
        assert_eq!(reader.resolve(&code).await.unwrap(), url);
    }
}

pub async fn concurrent_resolves_are_all_counted<R: Repository>(repository: R, n: u64) {
    let service = ShortenerService::new(repository, RandomGenerator::default());
    let code = service.create("https://example.com").await.unwrap();

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let service = service.clone();
            let code = code.clone();
            tokio::spawn(async move { service.resolve(&code).await.unwrap() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "https://example.com");
    }

    assert_eq!(service.stats(&code).await.unwrap(), n);
}

/// An alphabet of two letters and length three leaves eight codes in total.
pub async fn tiny_alphabet_exhausts_code_space<R: Repository>(repository: R) {
    let settings = RandomGeneratorSettings::builder()
        .alphabet("ab")
        .length(3)
        .build();
    let generator = RandomGenerator::new(settings).unwrap();
    let service = ShortenerService::new(repository, generator).with_max_attempts(3);

    let mut created = HashSet::new();
    let mut exhausted = false;
    for i in 0..200 {
        match service.create(&format!("https://example.com/{i}")).await {
            Ok(code) => assert!(created.insert(code)),
            Err(ShortenerError::CodeSpaceExhausted { attempts }) => {
                assert_eq!(attempts, 3);
                exhausted = true;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert!(exhausted);
    assert!(created.len() <= 8);
}
