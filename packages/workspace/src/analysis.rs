//! Static scan of a page script for event listener bindings.

use regex::Regex;
use scene_editor::{ListenerBinding, ListenerKind};
use std::sync::LazyLock;

static ADD_EVENT_LISTENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w.$\]\[]+)\s*\.\s*addEventListener\s*\(\s*['"]([\w:-]+)['"]"#).unwrap()
});

static ON_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w.$\]\[]+)\s*\.\s*on([a-z]+)\s*=\s*(?:function|\([^)]*\)\s*=>)").unwrap()
});

/// Listener bindings in `script`: every `addEventListener` call first, then
/// every `on<event>` handler assignment, each group in source order.
pub fn analyze_listeners(script: &str) -> Vec<ListenerBinding> {
    let added = ADD_EVENT_LISTENER
        .captures_iter(script)
        .map(|caps| binding(&caps, ListenerKind::AddEventListener));
    let assigned = ON_PROPERTY
        .captures_iter(script)
        .map(|caps| binding(&caps, ListenerKind::OnProperty));
    added.chain(assigned).collect()
}

fn binding(caps: &regex::Captures<'_>, kind: ListenerKind) -> ListenerBinding {
    ListenerBinding {
        target: caps[1].to_string(),
        event: caps[2].to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_event_listener_calls() {
        let script = r#"
            go.addEventListener('click', run);
            window . addEventListener("resize", layout);
        "#;

        let found = analyze_listeners(script);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].target, "go");
        assert_eq!(found[1].target, "window");
        assert_eq!(found[1].event, "resize");
        assert!(found
            .iter()
            .all(|b| b.kind == ListenerKind::AddEventListener));
    }

    #[test]
    fn test_handler_assignments_come_after() {
        let script = r#"
            button.onclick = function () {};
            form.onsubmit = (e) => e.preventDefault();
            button.addEventListener('mouseenter', hover);
            el.onload = handler;
        "#;

        let found = analyze_listeners(script);
        let summary: Vec<(&str, &str, ListenerKind)> = found
            .iter()
            .map(|b| (b.target.as_str(), b.event.as_str(), b.kind))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("button", "mouseenter", ListenerKind::AddEventListener),
                ("button", "click", ListenerKind::OnProperty),
                ("form", "submit", ListenerKind::OnProperty),
            ]
        );
    }

    #[test]
    fn test_dotted_targets() {
        let found = analyze_listeners("app.nav[0].addEventListener('focus', f)");
        assert_eq!(found[0].target, "app.nav[0]");
    }

    #[test]
    fn test_empty_script() {
        assert!(analyze_listeners("").is_empty());
    }
}
