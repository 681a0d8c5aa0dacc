#[cfg(test)]
mod types_tests;

#[cfg(test)]
mod tests {
    use crate::event::EventName;

    #[test]
    fn test_event_name_conversions() {
        let borrowed = EventName::from("order.created");
        let owned = EventName::from(String::from("order.created"));
        assert_eq!(borrowed, owned);
        assert_eq!(borrowed, "order.created");
        assert_eq!(owned.as_str(), "order.created");
        assert_eq!(owned.to_string(), "order.created");
        assert_eq!(EventName::from_static("order.created"), borrowed);
    }

    #[test]
    fn test_event_name_from_runtime_str() {
        let source = String::from("user.login");
        let name = EventName::from(source.as_str());
        drop(source);
        assert_eq!(name, "user.login");
    }

    #[test]
    fn test_event_name_ordering() {
        let mut names = vec![EventName::from("b"), EventName::from("a"), EventName::from("c")];
        names.sort();
        let names: Vec<&str> = names.iter().map(EventName::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
