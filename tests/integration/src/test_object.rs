//! Object CRUD integration tests.

#[cfg(test)]
mod tests {
    use std::io::Read;

    use atmos_client::{RequestBody, WriteOptions};
    use bytes::Bytes;

    use crate::{atmos_client, cleanup_objects, create_tagged_object, test_tag, test_user};

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_create_read_and_delete_object() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("crud");

        let id = create_tagged_object(&client, &user, &tag, b"hello, atmos!").expect("create");
        assert_eq!(id.as_str().len(), 44, "object ids are 44 hex characters");

        let mut content = Vec::new();
        client
            .read_object(&user, &id)
            .expect("read_object")
            .read_to_end(&mut content)
            .expect("read body");
        assert_eq!(content, b"hello, atmos!");

        client.delete_object(&user, &id).expect("delete_object");

        let err = client.read_object(&user, &id).err().expect("object should be gone");
        let fault = err.as_fault().expect("fault");
        assert_eq!(fault.http_status(), 404);
    }

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_update_object_content() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        let tag = test_tag("update");

        let id = create_tagged_object(&client, &user, &tag, b"v1").expect("create");

        let replacement = Bytes::from(vec![b'x'; 64 * 1024]);
        client
            .update_object(
                &user,
                &id,
                RequestBody::bytes(replacement.clone()),
                &WriteOptions::default(),
            )
            .expect("update_object");

        let mut content = Vec::new();
        client
            .read_object(&user, &id)
            .expect("read_object")
            .read_to_end(&mut content)
            .expect("read body");
        assert_eq!(content, replacement.as_ref());

        cleanup_objects(&client, &user, &[id]);
    }
}
