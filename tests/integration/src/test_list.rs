//! Tag listing integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atmos_client::ListQuery;
    use atmos_xml::DocumentListingParser;

    use crate::{atmos_client, cleanup_objects, create_tagged_object, test_tag, test_user};

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_page_through_tagged_objects() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("page");

        let ids: Vec<_> = (0..3)
            .map(|_| create_tagged_object(&client, &user, &tag, b"paged").expect("create"))
            .collect();

        let mut found = Vec::new();
        let mut query = ListQuery::new(tag.as_str()).limit(2);
        loop {
            let page = client.list_objects(&user, &query).expect("list_objects");
            found.extend(page.results.iter().cloned());
            if !page.has_more() {
                break;
            }
            query = query.after(&page);
        }

        for id in &ids {
            assert!(found.contains(id), "listing should contain {id}");
        }

        cleanup_objects(&client, &user, &ids);
    }

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_list_objects_with_metadata() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("records");

        let id = create_tagged_object(&client, &user, &tag, b"records").expect("create");

        let mut query = ListQuery::new(tag.as_str());
        query.user_metadata_tags = vec!["origin".to_owned()];
        let page = client
            .list_objects_with_metadata(&user, &query)
            .expect("list_objects_with_metadata");

        let record = page
            .results
            .iter()
            .find(|r| r.id == id.as_str())
            .expect("created object should be listed");
        assert!(record.user_metadata.iter().any(|m| m.name == "origin"));

        cleanup_objects(&client, &user, &[id]);
    }

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_list_with_document_parser() {
        let client = atmos_client()
            .expect("client")
            .with_listing_parser(Arc::new(DocumentListingParser::new()));
        let user = test_user().expect("user");
        let tag = test_tag("document");

        let id = create_tagged_object(&client, &user, &tag, b"document").expect("create");
        let page = client
            .list_objects(&user, &ListQuery::new(tag.as_str()))
            .expect("list_objects");
        assert!(page.results.contains(&id));

        cleanup_objects(&client, &user, &[id]);
    }
}
