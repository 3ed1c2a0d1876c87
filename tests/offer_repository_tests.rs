mod common;

use offer_curator::scrapers::ScrapedOffer;
use offer_curator::services::offer_repository::{url_hash, OfferRepository};

use crate::common::setup_test_db;

fn offer(url: &str) -> ScrapedOffer {
    ScrapedOffer {
        source: "kabum".to_string(),
        title: Some("SSD Kingston NV2 1TB 40% OFF".to_string()),
        url: url.to_string(),
        price: "R$ 399,90".to_string(),
        shop: "KaBuM".to_string(),
        image_url: Some("https://images.kabum.com.br/ssd.jpg".to_string()),
        coupon: Some("HARD10".to_string()),
    }
}

#[tokio::test]
async fn test_insert_is_idempotent_per_url() {
    let repo = OfferRepository::new(setup_test_db().await.unwrap());

    assert!(repo.insert(&offer("https://www.kabum.com.br/produto/1")).await);
    assert!(!repo.insert(&offer("https://www.kabum.com.br/produto/1")).await);
    assert!(repo.insert(&offer("https://www.kabum.com.br/produto/2")).await);

    let counts = repo.counts().await.unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.unposted, 2);
}

#[tokio::test]
async fn test_empty_url_is_never_stored() {
    let repo = OfferRepository::new(setup_test_db().await.unwrap());

    assert!(!repo.insert(&offer("   ")).await);
    assert_eq!(repo.counts().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_stored_fields() {
    let repo = OfferRepository::new(setup_test_db().await.unwrap());
    let url = "https://www.kabum.com.br/produto/7";
    assert!(repo.insert(&offer(url)).await);

    let rows = repo.list_unposted(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.url, url);
    assert_eq!(row.hash.as_deref(), Some(url_hash(url).as_str()));
    assert_eq!(row.price.as_deref(), Some("R$ 399,90"));
    assert_eq!(row.coupon.as_deref(), Some("HARD10"));
    assert!(!row.posted);
}

#[tokio::test]
async fn test_unposted_queue_is_oldest_first_and_mark_posted_is_idempotent() {
    let repo = OfferRepository::new(setup_test_db().await.unwrap());
    for i in 1..=3 {
        assert!(repo.insert(&offer(&format!("https://www.kabum.com.br/produto/{}", i))).await);
    }

    let queue = repo.list_unposted(2).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue[0].discovered_at <= queue[1].discovered_at);
    assert!(queue[0].url.ends_with("/1"));

    let posted_id = queue[0].id;
    repo.mark_posted(posted_id).await.unwrap();
    repo.mark_posted(posted_id).await.unwrap();

    let counts = repo.counts().await.unwrap();
    assert_eq!((counts.total, counts.posted, counts.unposted), (3, 1, 2));

    let queue = repo.list_unposted(10).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue.iter().all(|o| o.id != posted_id));

    let recent = repo.recent(1).await.unwrap();
    assert!(recent[0].url.ends_with("/3"));
}

