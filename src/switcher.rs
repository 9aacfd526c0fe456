//! Language switcher wiring: delegated click resolution and the active
//! indicator.
//!
//! The switcher is a container element (found by id) whose descendants carry
//! `data-lang`. A click anywhere inside a control, including on nested
//! markup such as an icon, counts as a click on that control.

use crate::i18n::Language;
use crate::page::{NodeId, Page, ACTIVE_CLASS, LANGUAGE_ATTRIBUTE};
use tracing::debug;

/// Default id of the switcher container.
pub const DEFAULT_SWITCHER_ID: &str = "language-switcher";

/// Work out which language a click on `target` asks for, if any.
///
/// Walks from `target` towards the root. The nearest ancestor-or-self with
/// `data-lang` is the control; it only counts if the switcher container is
/// reached on the way up.
pub fn language_for_click<P: Page + ?Sized>(
    page: &P,
    container_id: &str,
    target: NodeId,
) -> Option<Language> {
    let container = page.element_by_id(container_id)?;
    let mut control: Option<NodeId> = None;
    let mut current = Some(target);

    while let Some(node) = current {
        if control.is_none() && page.attribute(node, LANGUAGE_ATTRIBUTE).is_some() {
            control = Some(node);
        }
        if node == container {
            let code = page.attribute(control?, LANGUAGE_ATTRIBUTE)?;
            return match Language::from_code(code) {
                Ok(language) => Some(language),
                Err(e) => {
                    debug!("Ignoring switcher control: {}", e);
                    None
                }
            };
        }
        current = page.parent(node);
    }

    None
}

/// Mark exactly the controls for `current` active and clear every other one.
/// Returns the number of controls now active.
pub fn mark_active<P: Page + ?Sized>(page: &mut P, container_id: &str, current: Language) -> usize {
    let Some(container) = page.element_by_id(container_id) else {
        return 0;
    };

    let controls: Vec<(NodeId, bool)> = page
        .descendants_with_attribute(container, LANGUAGE_ATTRIBUTE)
        .into_iter()
        .map(|node| {
            let is_current = page.attribute(node, LANGUAGE_ATTRIBUTE) == Some(current.code());
            (node, is_current)
        })
        .collect();

    for (node, is_current) in &controls {
        page.set_class(*node, ACTIVE_CLASS, *is_current);
    }

    controls.iter().filter(|(_, is_current)| *is_current).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    fn page_with_switcher() -> (MemoryPage, NodeId) {
        let mut page = MemoryPage::new();
        let container =
            page.add_switcher(DEFAULT_SWITCHER_ID, &[Language::SPANISH, Language::ENGLISH]);
        (page, container)
    }

    fn control(page: &MemoryPage, container: NodeId, code: &str) -> NodeId {
        page.descendants_with_attribute(container, LANGUAGE_ATTRIBUTE)
            .into_iter()
            .find(|node| page.attribute(*node, LANGUAGE_ATTRIBUTE) == Some(code))
            .expect("control should exist")
    }

    // ==================== Click Delegation Tests ====================

    #[test]
    fn test_click_on_control() {
        let (page, container) = page_with_switcher();
        let en = control(&page, container, "en");

        assert_eq!(
            language_for_click(&page, DEFAULT_SWITCHER_ID, en),
            Some(Language::ENGLISH)
        );
    }

    #[test]
    fn test_click_on_nested_child_of_control() {
        let (mut page, container) = page_with_switcher();
        let en = control(&page, container, "en");
        let icon = page.append_element(en, "span");

        assert_eq!(
            language_for_click(&page, DEFAULT_SWITCHER_ID, icon),
            Some(Language::ENGLISH)
        );
    }

    #[test]
    fn test_click_on_container_itself_is_ignored() {
        let (page, container) = page_with_switcher();
        assert_eq!(language_for_click(&page, DEFAULT_SWITCHER_ID, container), None);
    }

    #[test]
    fn test_click_outside_container_is_ignored() {
        let (mut page, _) = page_with_switcher();
        let body = page.body();
        let stray = page.append_element(body, "button");
        page.set_attribute(stray, LANGUAGE_ATTRIBUTE, "en");

        assert_eq!(language_for_click(&page, DEFAULT_SWITCHER_ID, stray), None);
    }

    #[test]
    fn test_click_on_unsupported_code_is_ignored() {
        let (mut page, container) = page_with_switcher();
        let fr = page.append_element(container, "button");
        page.set_attribute(fr, LANGUAGE_ATTRIBUTE, "fr");

        assert_eq!(language_for_click(&page, DEFAULT_SWITCHER_ID, fr), None);
    }

    #[test]
    fn test_click_without_switcher_is_ignored() {
        let (page, container) = page_with_switcher();
        let en = control(&page, container, "en");
        assert_eq!(language_for_click(&page, "other-id", en), None);
    }

    // ==================== Active Indicator Tests ====================

    #[test]
    fn test_mark_active_exactly_one() {
        let (mut page, container) = page_with_switcher();
        let es = control(&page, container, "es");
        let en = control(&page, container, "en");

        assert_eq!(mark_active(&mut page, DEFAULT_SWITCHER_ID, Language::SPANISH), 1);
        assert!(page.has_class(es, ACTIVE_CLASS));
        assert!(!page.has_class(en, ACTIVE_CLASS));

        assert_eq!(mark_active(&mut page, DEFAULT_SWITCHER_ID, Language::ENGLISH), 1);
        assert!(!page.has_class(es, ACTIVE_CLASS));
        assert!(page.has_class(en, ACTIVE_CLASS));
    }

    #[test]
    fn test_mark_active_without_switcher() {
        let mut page = MemoryPage::new();
        assert_eq!(mark_active(&mut page, DEFAULT_SWITCHER_ID, Language::ENGLISH), 0);
        assert_eq!(page.mutations(), 0);
    }
}
