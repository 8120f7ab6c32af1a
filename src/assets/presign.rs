use async_trait::async_trait;
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{ObjectStorage, StorageResult};

/// Names of the fields of a projection that hold object keys.
#[derive(Debug, Clone, Copy)]
pub struct AssetFields(pub &'static [&'static str]);

/// A response projection carrying object keys that must leave the service as
/// signed URLs.
#[async_trait]
pub trait Presignable: Send + Sized {
    /// The stored key of `field`, if the field is one of this projection's
    /// asset fields and is set.
    fn asset_key(&self, field: &str) -> Option<&str>;

    fn set_asset_url(&mut self, field: &str, url: String);

    /// Resolve nested projections. Runs before the projection's own fields.
    async fn presign_nested(&mut self, _resolver: &AssetResolver) -> StorageResult<()> {
        Ok(())
    }
}

/// Replaces object keys with signed read URLs.
///
/// Every URL of one call is generated concurrently. Results keep the input
/// order and a single failure fails the whole call.
#[derive(Clone)]
pub struct AssetResolver {
    storage: Arc<dyn ObjectStorage>,
    ttl: Duration,
}

impl AssetResolver {
    pub fn new(storage: Arc<dyn ObjectStorage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub async fn presign_one<T: Presignable>(
        &self,
        mut item: T,
        fields: AssetFields,
    ) -> StorageResult<T> {
        item.presign_nested(self).await?;

        let pending: Vec<(&'static str, String)> = fields
            .0
            .iter()
            .filter_map(|field| {
                item.asset_key(field)
                    .filter(|key| !key.is_empty())
                    .map(|key| (*field, key.to_owned()))
            })
            .collect();

        let urls =
            try_join_all(pending.iter().map(|(_, key)| self.storage.read_url(key, self.ttl)))
                .await?;

        for ((field, _), url) in pending.into_iter().zip(urls) {
            item.set_asset_url(field, url);
        }

        Ok(item)
    }

    pub async fn presign_many<T: Presignable>(
        &self,
        items: Vec<T>,
        fields: AssetFields,
    ) -> StorageResult<Vec<T>> {
        try_join_all(items.into_iter().map(|item| self.presign_one(item, fields))).await
    }

    /// Sign a lone optional key, leaving `None` and empty keys untouched.
    pub async fn presign_key(&self, key: Option<String>) -> StorageResult<Option<String>> {
        match key {
            Some(key) if !key.is_empty() => {
                self.storage.read_url(&key, self.ttl).await.map(Some)
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockStorage;
    use crate::storage::StorageError;

    #[derive(Debug, Clone, PartialEq)]
    struct Page {
        number: i32,
        image: Option<String>,
    }

    const PAGE_ASSETS: AssetFields = AssetFields(&["image"]);

    impl Presignable for Page {
        fn asset_key(&self, field: &str) -> Option<&str> {
            match field {
                "image" => self.image.as_deref(),
                _ => None,
            }
        }

        fn set_asset_url(&mut self, field: &str, url: String) {
            if field == "image" {
                self.image = Some(url);
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Issue {
        title: String,
        cover: Option<String>,
        soundtrack: Option<String>,
        pages: Option<Vec<Page>>,
    }

    const ISSUE_ASSETS: AssetFields = AssetFields(&["cover", "soundtrack"]);

    #[async_trait]
    impl Presignable for Issue {
        fn asset_key(&self, field: &str) -> Option<&str> {
            match field {
                "cover" => self.cover.as_deref(),
                "soundtrack" => self.soundtrack.as_deref(),
                _ => None,
            }
        }

        fn set_asset_url(&mut self, field: &str, url: String) {
            match field {
                "cover" => self.cover = Some(url),
                "soundtrack" => self.soundtrack = Some(url),
                _ => {}
            }
        }

        async fn presign_nested(&mut self, resolver: &AssetResolver) -> StorageResult<()> {
            if let Some(pages) = self.pages.take() {
                self.pages = Some(resolver.presign_many(pages, PAGE_ASSETS).await?);
            }
            Ok(())
        }
    }

    fn issue(title: &str, cover: Option<&str>) -> Issue {
        Issue {
            title: title.to_string(),
            cover: cover.map(str::to_string),
            soundtrack: None,
            pages: None,
        }
    }

    fn resolver(storage: &Arc<MockStorage>) -> AssetResolver {
        AssetResolver::new(storage.clone(), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn projection_without_keys_is_returned_unchanged() {
        let storage = Arc::new(MockStorage::new());
        let mut empty = issue("Empty", None);
        empty.soundtrack = Some(String::new());

        let result = resolver(&storage).presign_one(empty.clone(), ISSUE_ASSETS).await.unwrap();

        assert_eq!(result, empty);
        assert_eq!(MockStorage::calls(&storage.read_url_calls), 0);
    }

    #[tokio::test]
    async fn sequence_order_survives_uneven_latency() {
        let storage = Arc::new(MockStorage::new());
        storage.delay_presign("a/cover.png", Duration::from_millis(60));
        storage.delay_presign("b/cover.png", Duration::from_millis(30));

        let items = vec![
            issue("a", Some("a/cover.png")),
            issue("b", Some("b/cover.png")),
            issue("c", Some("c/cover.png")),
            issue("d", None),
        ];

        let result = resolver(&storage).presign_many(items, ISSUE_ASSETS).await.unwrap();

        let titles: Vec<_> = result.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
        assert_eq!(result[0].cover.as_deref(), Some(MockStorage::signed("a/cover.png").as_str()));
        assert_eq!(result[2].cover.as_deref(), Some(MockStorage::signed("c/cover.png").as_str()));
        assert_eq!(result[3].cover, None);
    }

    #[tokio::test]
    async fn nested_pages_and_own_fields_are_signed() {
        let storage = Arc::new(MockStorage::new());
        let mut item = issue("Issue", Some("issue/cover.png"));
        item.pages = Some(vec![
            Page { number: 1, image: Some("issue/pages/1/image.png".to_string()) },
            Page { number: 2, image: Some("issue/pages/2/image.png".to_string()) },
        ]);

        let result = resolver(&storage).presign_one(item, ISSUE_ASSETS).await.unwrap();

        let pages = result.pages.unwrap();
        assert_eq!(pages[0].number, 1);
        assert_eq!(
            pages[0].image.as_deref(),
            Some(MockStorage::signed("issue/pages/1/image.png").as_str())
        );
        assert_eq!(
            pages[1].image.as_deref(),
            Some(MockStorage::signed("issue/pages/2/image.png").as_str())
        );
        assert_eq!(result.cover.as_deref(), Some(MockStorage::signed("issue/cover.png").as_str()));
    }

    #[tokio::test]
    async fn one_failing_field_fails_the_whole_batch() {
        let storage = Arc::new(MockStorage::new());
        storage.fail_presign_on("b/");

        let items = vec![issue("a", Some("a/cover.png")), issue("b", Some("b/cover.png"))];
        let result = resolver(&storage).presign_many(items, ISSUE_ASSETS).await;

        assert!(matches!(result, Err(StorageError::PresignFailed(_))));
    }

    #[tokio::test]
    async fn lone_keys_skip_empty_values() {
        let storage = Arc::new(MockStorage::new());
        let resolver = resolver(&storage);

        assert_eq!(resolver.presign_key(None).await.unwrap(), None);
        assert_eq!(resolver.presign_key(Some(String::new())).await.unwrap(), Some(String::new()));
        assert_eq!(
            resolver.presign_key(Some("creators/x/avatar.png".into())).await.unwrap(),
            Some(MockStorage::signed("creators/x/avatar.png"))
        );
    }
}
