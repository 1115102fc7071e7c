use azaccess_core::ErrorKind;
use pretty_assertions::assert_eq;

use crate::mock::FakeAzure;
use crate::shared_key_client;

#[tokio::test]
async fn test_list_empty_container() {
    let fake = FakeAzure::new().with_container("samples");
    let client = shared_key_client(&fake);

    let names = client.list("samples").collect().await.unwrap();
    assert!(names.is_empty());
}

#[tokio::test]
async fn test_list_follows_next_marker() {
    let fake = FakeAzure::new()
        .with_page_size(2)
        .with_blob("samples", "a.txt", b"a")
        .with_blob("samples", "b.txt", b"b")
        .with_blob("samples", "c.txt", b"c")
        .with_blob("samples", "dir/d & e.txt", b"d")
        .with_blob("samples", "f.txt", b"f");
    let client = shared_key_client(&fake);

    let names = client.list("samples").collect().await.unwrap();
    assert_eq!(
        names,
        vec!["a.txt", "b.txt", "c.txt", "dir/d & e.txt", "f.txt"]
    );
    assert_eq!(fake.list_requests(), 3);
}

#[tokio::test]
async fn test_list_is_lazy() {
    let fake = FakeAzure::new()
        .with_page_size(1)
        .with_blob("samples", "a.txt", b"a")
        .with_blob("samples", "b.txt", b"b");
    let client = shared_key_client(&fake);

    let mut lister = client.list("samples");
    assert_eq!(fake.list_requests(), 0);

    assert_eq!(lister.next().await.unwrap().as_deref(), Some("a.txt"));
    assert_eq!(fake.list_requests(), 1);
}

#[tokio::test]
async fn test_list_can_restart() {
    let fake = FakeAzure::new()
        .with_page_size(2)
        .with_blob("samples", "a.txt", b"a")
        .with_blob("samples", "b.txt", b"b")
        .with_blob("samples", "c.txt", b"c");
    let client = shared_key_client(&fake);

    let mut lister = client.list("samples");
    assert_eq!(lister.next().await.unwrap().as_deref(), Some("a.txt"));
    assert_eq!(lister.next().await.unwrap().as_deref(), Some("b.txt"));
    assert_eq!(lister.next().await.unwrap().as_deref(), Some("c.txt"));
    assert_eq!(lister.next().await.unwrap(), None);
    assert_eq!(lister.next().await.unwrap(), None);

    lister.reset();
    assert_eq!(
        lister.collect().await.unwrap(),
        vec!["a.txt", "b.txt", "c.txt"]
    );
}

#[tokio::test]
async fn test_list_missing_container() {
    let client = shared_key_client(&FakeAzure::new());

    let err = client.list("absent").collect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("ContainerNotFound"), "{err}");
}

#[tokio::test]
async fn test_list_empty_container_name() {
    let client = shared_key_client(&FakeAzure::new());

    let err = client.list("").next().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}
