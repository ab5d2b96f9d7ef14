//! List tags use case

use crate::domain::tags::TagMeta;
use crate::domain::TagObject;

/// Documentation for every tag an object type answers, sorted by name.
pub fn list_tags<T: TagObject>() -> Vec<TagMeta> {
    T::tag_processor().tags().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlagHolder;

    #[test]
    fn list_tags_includes_flag_tags_in_name_order() {
        let names: Vec<&str> = list_tags::<FlagHolder>().iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec!["flag", "flag_expiration", "has_flag", "list_flags", "name"]
        );
    }

    #[test]
    fn list_tags_carries_return_types() {
        let tags = list_tags::<FlagHolder>();
        let has_flag = tags.iter().find(|m| m.name == "has_flag").unwrap();
        assert_eq!(has_flag.returns, "Boolean");
        assert_eq!(has_flag.syntax, "has_flag[<flag_name>]");
    }
}
