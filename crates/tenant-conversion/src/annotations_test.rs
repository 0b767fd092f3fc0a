//! Unit tests for the annotation codec

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_join_list_empty_is_absent() {
        assert_eq!(join_list(Vec::<String>::new()), None);
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(["a"]), Some("a".to_string()));
        assert_eq!(join_list(["a", "b", "c"]), Some("a,b,c".to_string()));
    }

    #[test]
    fn test_split_list_empty_yields_one_empty_element() {
        assert_eq!(split_list(""), vec![""]);
        assert_eq!(split_list("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_list_value_treats_empty_as_absent() {
        let mut annotations = Annotations::new();
        annotations.insert(OWNER_GROUPS.to_string(), String::new());
        assert_eq!(list_value(&annotations, OWNER_GROUPS), None);
        assert_eq!(list_value(&annotations, OWNER_USERS), None);

        annotations.insert(OWNER_USERS.to_string(), "alice,,bob".to_string());
        assert_eq!(list_value(&annotations, OWNER_USERS), Some(vec!["alice", "bob"]));
    }

    #[test]
    fn test_set_list_omits_empty() {
        let mut annotations = Annotations::new();
        set_list(&mut annotations, OWNER_GROUPS, Vec::<&str>::new());
        assert!(annotations.is_empty());

        set_list(&mut annotations, OWNER_GROUPS, ["teamA", "teamB"]);
        assert_eq!(annotations[OWNER_GROUPS], "teamA,teamB");
    }

    #[test]
    fn test_parse_bool_accepts_canonical_literals() {
        for literal in ["true", "TRUE", "True", "t", "T", "1"] {
            assert!(parse_bool("oil", ENABLE_NODE_PORTS, literal).expect("should parse"), "{}", literal);
        }
        for literal in ["false", "FALSE", "False", "f", "F", "0"] {
            assert!(!parse_bool("oil", ENABLE_NODE_PORTS, literal).expect("should parse"), "{}", literal);
        }
    }

    #[test]
    fn test_parse_bool_rejects_everything_else() {
        for literal in ["maybe", "", "yes", "no", "2", " true", "truee", "tRuE", "fALSE", "FaLsE", "tRUE"] {
            match parse_bool("oil", ENABLE_NODE_PORTS, literal) {
                Err(ConversionError::AnnotationParse { tenant, key, value }) => {
                    assert_eq!(tenant, "oil");
                    assert_eq!(key, ENABLE_NODE_PORTS);
                    assert_eq!(value, literal);
                }
                other => panic!("expected parse error for {:?}, got {:?}", literal, other),
            }
        }
    }

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }

    #[test]
    fn test_purge_keys_is_idempotent() {
        let mut metadata = ObjectMeta {
            annotations: Some(Annotations::from([
                (OWNER_GROUPS.to_string(), "teamA".to_string()),
                ("keep.me/please".to_string(), "yes".to_string()),
            ])),
            ..Default::default()
        };

        purge_keys(&mut metadata, MANAGED_KEYS);
        purge_keys(&mut metadata, MANAGED_KEYS);

        let annotations = metadata.annotations.expect("annotations should remain");
        assert_eq!(annotations.len(), 1);
        assert!(annotations.contains_key("keep.me/please"));
    }

    #[test]
    fn test_purge_keys_without_annotations() {
        let mut metadata = ObjectMeta::default();
        purge_keys(&mut metadata, [OWNER_GROUPS]);
        assert!(metadata.annotations.is_none());
    }

    #[test]
    fn test_managed_keys_are_unique() {
        let unique: std::collections::BTreeSet<&str> = MANAGED_KEYS.iter().copied().collect();
        assert_eq!(unique.len(), MANAGED_KEYS.len());
    }
}
