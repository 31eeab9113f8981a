use mockito::Matcher;
use ragent_rag::{Domain, HttpRetriever, Retriever, SearchRequest};
use std::time::Duration;

#[tokio::test]
async fn test_search_maps_rows_and_applies_threshold() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "query": "paella arroz",
            "document_type": "public",
            "k": 8,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"results": [
                {"id": 1, "content": "La paella lleva arroz.", "metadata": {"filename": "paella.pdf", "chunk_id": "1-0"}, "similarity": 0.91},
                {"id": "2", "content": "Azafrán", "metadata": {"source": "recetas/azafran.docx"}, "similarity": 0.62},
                {"id": 3, "content": "Ruido", "metadata": null, "similarity": 0.2}
            ]}"#,
        )
        .create_async()
        .await;

    let retriever = HttpRetriever::new(server.url(), Duration::from_secs(5)).unwrap();
    let docs = retriever
        .search(&SearchRequest::new("paella arroz", Domain::Public, 8, 0.5))
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].document_id, "1");
    assert_eq!(docs[0].chunk_id, "1-0");
    assert_eq!(docs[0].title, "paella.pdf");
    assert_eq!(docs[1].title, "azafran.docx");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_sends_department_filter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "document_type": "private",
            "department": "hr",
        })))
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let retriever = HttpRetriever::new(server.url(), Duration::from_secs(5)).unwrap();
    let request = SearchRequest::new("vacaciones", Domain::Private, 5, 0.5)
        .with_department(Some("hr".to_string()));

    assert!(retriever.search(&request).await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/search")
        .with_status(503)
        .create_async()
        .await;

    let retriever = HttpRetriever::new(server.url(), Duration::from_secs(5)).unwrap();
    let result = retriever
        .search(&SearchRequest::new("x", Domain::Public, 8, 0.5))
        .await;

    assert!(result.unwrap_err().to_string().contains("503"));
}
