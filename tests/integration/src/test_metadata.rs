//! Metadata integration tests.

#[cfg(test)]
mod tests {
    use atmos_model::{Metadata, MetadataTag};

    use crate::{atmos_client, cleanup_objects, create_tagged_object, test_tag, test_user};

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_set_and_read_user_metadata() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("meta");

        let id = create_tagged_object(&client, &user, &tag, b"metadata").expect("create");
        client
            .set_user_metadata(&user, &id, &[Metadata::new("color", "blue")])
            .expect("set_user_metadata");

        let metadata = client
            .get_user_metadata(&user, &id, &[MetadataTag::new("color", false)])
            .expect("get_user_metadata");
        assert_eq!(metadata, vec![Metadata::new("color", "blue")]);

        let all = client
            .get_user_metadata(&user, &id, &[])
            .expect("get_user_metadata");
        assert!(all.contains(&Metadata::listable(tag.as_str(), "1")));
        assert!(all.contains(&Metadata::new("origin", "integration")));

        cleanup_objects(&client, &user, &[id]);
    }

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_read_system_metadata() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("sysmeta");

        let id = create_tagged_object(&client, &user, &tag, b"twelve bytes").expect("create");
        let metadata = client
            .get_system_metadata(&user, &id, &[MetadataTag::new("size", false)])
            .expect("get_system_metadata");
        assert_eq!(metadata, vec![Metadata::new("size", "12")]);

        cleanup_objects(&client, &user, &[id]);
    }
}
