use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId};

/// Query string of `GET /items`. Pages are 1-based; an empty search is unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsQuery {
    pub page: u32,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub has_more: bool,
}

/// Body of `POST /selected`; replaces the whole persisted selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPayload {
    pub selected: Vec<ItemId>,
}

/// Body of `POST /reorder`. Carries global ids, never window indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_id: ItemId,
    pub to_id: ItemId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_page_uses_camel_case_has_more() {
        let page: ItemsPage =
            serde_json::from_str(r#"{"items":[{"id":21},{"id":22}],"hasMore":false}"#)
                .expect("decode page");
        assert_eq!(page.items, vec![Item::new(21), Item::new(22)]);
        assert!(!page.has_more);
    }

    #[test]
    fn reorder_request_serializes_global_ids() {
        let body = serde_json::to_value(ReorderRequest {
            from_id: ItemId(10),
            to_id: ItemId(3),
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({ "fromId": 10, "toId": 3 }));
    }

    #[test]
    fn selected_payload_is_a_flat_id_array() {
        let body = serde_json::to_value(SelectedPayload {
            selected: vec![ItemId(3), ItemId(7)],
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({ "selected": [3, 7] }));

        let ids: Vec<ItemId> = serde_json::from_str("[1, 5, 9]").expect("decode ids");
        assert_eq!(ids, vec![ItemId(1), ItemId(5), ItemId(9)]);
    }
}
