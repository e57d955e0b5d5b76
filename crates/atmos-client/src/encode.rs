//! Encoding of metadata, grants and tag lists into request headers.
//!
//! Every function only touches the header set it is given, and leaves it
//! untouched when there is nothing to encode.

use atmos_model::header::{GROUP_ACL, LISTABLE_META, META, TAGS, USER_ACL};
use atmos_model::{Grant, GranteeKind, HeaderSet, Metadata, MetadataTag};

/// Encode metadata entries.
///
/// Entries are partitioned by their listable flag. Each partition is joined
/// as `name=value` pairs separated by `", "` and goes into `x-emc-meta` or
/// `x-emc-listable-meta`. A header is only set when its partition has
/// entries.
pub fn encode_metadata(headers: &mut HeaderSet, metadata: &[Metadata]) {
    let (listable, regular): (Vec<&Metadata>, Vec<&Metadata>) =
        metadata.iter().partition(|m| m.listable);

    if !listable.is_empty() {
        headers.insert(LISTABLE_META, join_pairs(&listable));
    }
    if !regular.is_empty() {
        headers.insert(META, join_pairs(&regular));
    }
}

fn join_pairs(entries: &[&Metadata]) -> String {
    entries
        .iter()
        .map(|m| m.to_header_pair())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encode an access-control list.
///
/// Grants are split by grantee kind into `x-emc-useracl` and
/// `x-emc-groupacl`, each a comma-joined list of `subject=PERMISSION`.
/// When `grants` is non-empty both headers are set, even if one of them ends
/// up empty.
pub fn encode_acl(headers: &mut HeaderSet, grants: &[Grant]) {
    if grants.is_empty() {
        return;
    }

    let join = |kind: GranteeKind| {
        grants
            .iter()
            .filter(|g| g.grantee.kind == kind)
            .map(Grant::to_header_pair)
            .collect::<Vec<_>>()
            .join(",")
    };

    headers.insert(USER_ACL, join(GranteeKind::User));
    headers.insert(GROUP_ACL, join(GranteeKind::Group));
}

/// Encode the metadata names a read should return, as `x-emc-tags`.
pub fn encode_metadata_tags(headers: &mut HeaderSet, tags: &[MetadataTag]) {
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    encode_tag_list(headers, TAGS, &names);
}

/// Set `header` to the comma-joined `tags`, if there are any.
pub fn encode_tag_list<S: AsRef<str>>(headers: &mut HeaderSet, header: &str, tags: &[S]) {
    if tags.is_empty() {
        return;
    }
    let joined = tags
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    headers.insert(header, joined);
}

#[cfg(test)]
mod tests {
    use atmos_model::header::USER_TAGS;
    use atmos_model::{Grantee, Permission};

    use super::*;

    #[test]
    fn test_should_encode_single_regular_entry() {
        let mut headers = HeaderSet::new();
        encode_metadata(&mut headers, &[Metadata::new("a", "1")]);

        assert_eq!(headers.get(META), Some("a=1"));
        assert!(!headers.contains(LISTABLE_META));
    }

    #[test]
    fn test_should_partition_metadata_by_listable_flag() {
        let mut headers = HeaderSet::new();
        encode_metadata(
            &mut headers,
            &[
                Metadata::new("a", "1"),
                Metadata::listable("color", "blue"),
                Metadata::new("b", "x,y\nz"),
                Metadata::listable("shape", "round"),
            ],
        );

        assert_eq!(headers.get(META), Some("a=1, b=xyz"));
        assert_eq!(headers.get(LISTABLE_META), Some("color=blue, shape=round"));
    }

    #[test]
    fn test_should_leave_headers_untouched_for_empty_input() {
        let mut headers = HeaderSet::new();
        encode_metadata(&mut headers, &[]);
        encode_acl(&mut headers, &[]);
        encode_metadata_tags(&mut headers, &[]);
        encode_tag_list::<&str>(&mut headers, USER_TAGS, &[]);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_should_set_both_acl_headers() {
        let mut headers = HeaderSet::new();
        encode_acl(
            &mut headers,
            &[
                Grant::new(Grantee::user("u1"), Permission::FullControl),
                Grant::new(Grantee::user("u2"), Permission::Read),
            ],
        );

        assert_eq!(headers.get(USER_ACL), Some("u1=FULL_CONTROL,u2=READ"));
        assert_eq!(headers.get(GROUP_ACL), Some(""));
    }

    #[test]
    fn test_should_split_acl_by_grantee_kind() {
        let mut headers = HeaderSet::new();
        encode_acl(
            &mut headers,
            &[
                Grant::new(Grantee::group("other"), Permission::None),
                Grant::new(Grantee::user("owner"), Permission::Write),
            ],
        );

        assert_eq!(headers.get(USER_ACL), Some("owner=WRITE"));
        assert_eq!(headers.get(GROUP_ACL), Some("other=NONE"));
    }

    #[test]
    fn test_should_join_tags_with_commas() {
        let mut headers = HeaderSet::new();
        encode_metadata_tags(
            &mut headers,
            &[MetadataTag::new("size", false), MetadataTag::new("color", true)],
        );
        assert_eq!(headers.get(TAGS), Some("size,color"));

        encode_tag_list(&mut headers, USER_TAGS, &["a".to_owned(), "b".to_owned()]);
        assert_eq!(headers.get(USER_TAGS), Some("a,b"));
    }
}
