//! Error mapping integration tests.

#[cfg(test)]
mod tests {
    use atmos_client::AtmosError;
    use atmos_model::{ObjectId, UserContext};

    use crate::{atmos_client, test_user};

    const MISSING_ID: &str = "4924264aa10573d404924281caf51f049242d810edee";

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_report_missing_object_as_fault() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");

        let err = client
            .delete_object(&user, &ObjectId::new(MISSING_ID))
            .unwrap_err();
        let fault = err.as_fault().expect("fault");
        assert_eq!(fault.http_status(), 404);
        assert!(fault.error_code().is_some());
        assert!(!fault.message().is_empty());
    }

    #[test]
    #[ignore = "requires Atmos endpoint"]
    fn test_should_reject_wrong_secret() {
        let client = atmos_client().expect("client");
        let user = test_user().expect("user");
        // valid Base64, wrong key
        let impostor = UserContext::new(user.uid, "d3Jvbmctc2VjcmV0");

        let err = client
            .delete_object(&impostor, &ObjectId::new(MISSING_ID))
            .unwrap_err();
        match err {
            AtmosError::Fault(fault) => assert_eq!(fault.http_status(), 403),
            other => panic!("expected a fault, got {other}"),
        }
    }
}
