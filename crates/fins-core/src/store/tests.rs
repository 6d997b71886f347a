//! Store Integration Tests
//!
//! Grid and setting stores wired to the persister over in-memory storage.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::config::StoreConfig;
    use crate::domain::{
        BgMode, GridItemPatch, Group, ItemSize, NewGridItem, NewGroup, Props, SearchEngine,
        StoreError, Widget, KEY_COMPRESSED, KEY_CURRENT_ENGINE, KEY_CURRENT_GROUP, KEY_GROUPS,
        KEY_ITEMS, KEY_SEARCH_ENGINES, KEY_TITLE,
    };
    use crate::repository::{KeyValueStorage, MemoryStorage, StorageArea};
    use crate::sync::decode_payload;
    use crate::testing::{harness, harness_with, toast_messages};

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn assert_filter_invariant(h: &crate::testing::Harness) {
        let active = h.app.grid.current_group_id();
        let expected: Vec<_> = h
            .app
            .grid
            .items()
            .into_iter()
            .filter(|i| i.group_id == active)
            .collect();
        assert_eq!(h.app.grid.current_items(), expected);
    }

    async fn seed_local(storage: &MemoryStorage, items: Value) {
        let map = match items {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        storage.set(map, StorageArea::Local).await.unwrap();
    }

    // ========================
    // Grid
    // ========================

    #[tokio::test]
    async fn test_init_seeds_defaults_and_persists_them() {
        let mut h = harness();
        h.app.init().await.unwrap();

        let groups: Vec<String> = h.app.grid.groups().into_iter().map(|g| g.id).collect();
        assert_eq!(groups, vec!["default_home", "default_work"]);
        assert_eq!(h.app.grid.items().len(), 3);
        assert_eq!(h.app.grid.current_group_id(), "default_home");

        h.persister.flush().await;
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_ITEMS].as_array().map(Vec::len), Some(3));
        assert_eq!(local[KEY_GROUPS][0]["isDefault"], json!(true));
    }

    #[tokio::test]
    async fn test_init_loads_stored_state() {
        let storage = MemoryStorage::new();
        seed_local(
            &storage,
            json!({
                KEY_GROUPS: [
                    { "id": "a", "name": "A", "icon": "i", "isDefault": true },
                    { "id": "b", "name": "B", "icon": "i" }
                ],
                KEY_ITEMS: [
                    { "id": "x", "groupId": "b", "type": "clock-card", "size": "2x1", "props": {} },
                    { "bogus": true }
                ],
                KEY_CURRENT_GROUP: "b"
            }),
        )
        .await;
        let mut h = harness_with(storage, StoreConfig::default());
        h.app.init().await.unwrap();

        assert_eq!(h.app.grid.groups().len(), 2);
        assert_eq!(h.app.grid.current_group_id(), "b");
        let current = h.app.grid.current_items();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].size, ItemSize::TwoByOne);

        // Nothing was seeded, so nothing needs writing
        assert_eq!(h.persister.flush().await, 0);
    }

    #[tokio::test]
    async fn test_init_keeps_incomplete_groups_and_their_items() {
        let storage = MemoryStorage::new();
        seed_local(
            &storage,
            json!({
                KEY_GROUPS: [
                    { "id": "default_home", "name": "Home", "icon": "ri-home-4-line", "isDefault": true },
                    { "id": "g2", "name": "Reading" },
                    { "name": "no id" }
                ],
                KEY_ITEMS: [
                    { "id": "r1", "groupId": "g2", "type": "clock-card", "size": "1x1", "props": {} }
                ],
                KEY_CURRENT_GROUP: "g2"
            }),
        )
        .await;
        let mut h = harness_with(storage, StoreConfig::default());
        h.app.init().await.unwrap();

        let groups: Vec<String> = h.app.grid.groups().into_iter().map(|g| g.id).collect();
        assert_eq!(groups, vec!["default_home", "g2"]);
        assert_eq!(h.app.grid.current_group_id(), "g2");
        assert_eq!(h.app.grid.current_items().len(), 1);

        // Loaded groups are not reseeded over the stored list
        assert_eq!(h.persister.flush().await, 0);
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_GROUPS][1]["id"], json!("g2"));

        h.app.grid.set_current_group("default_home").unwrap();
        h.persister.flush().await;
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_GROUPS][1]["id"], json!("g2"));
        assert_eq!(local[KEY_ITEMS][0]["groupId"], json!("g2"));
    }

    #[tokio::test]
    async fn test_init_ignores_unknown_current_group() {
        let storage = MemoryStorage::new();
        seed_local(&storage, json!({ KEY_CURRENT_GROUP: "gone" })).await;
        let h = harness_with(storage, StoreConfig::default());
        h.app.init().await.unwrap();
        assert_eq!(h.app.grid.current_group_id(), "default_home");
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let h = harness();
        h.app.init().await.unwrap();
        let id = h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::CLOCK, Props::new()),
            ItemSize::OneByOne,
        ));
        h.app.init().await.unwrap();
        assert!(h.app.grid.find_item(&id).is_some());
    }

    #[tokio::test]
    async fn test_failed_init_keeps_persister_closed() {
        let mut h = harness();
        h.storage.set_unavailable(true);
        let err = h.app.grid.init().await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(!h.app.grid.is_initialized());

        h.storage.set_unavailable(false);
        h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::LINK_CARD, props(json!({ "name": "Early" }))),
            ItemSize::OneByOne,
        ));
        h.persister.flush().await;
        assert!(h.storage.snapshot(StorageArea::Local).is_empty());
    }

    #[tokio::test]
    async fn test_add_item_uses_active_group() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.persister.flush().await;

        let id = h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::LINK_CARD, props(json!({ "name": "Test" }))),
            ItemSize::OneByOne,
        ));

        let item = h.app.grid.find_item(&id).unwrap();
        assert_eq!(item.group_id, "default_home");
        assert!(!["1", "2", "3"].contains(&id.as_str()));
        assert_filter_invariant(&h);

        assert_eq!(h.persister.flush().await, 1);
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_ITEMS].as_array().map(Vec::len), Some(4));
        assert_eq!(local[KEY_ITEMS][3]["props"], json!({ "name": "Test" }));
    }

    #[tokio::test]
    async fn test_item_mutations_keep_filter_invariant() {
        let h = harness();
        h.app.init().await.unwrap();

        let a = h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::CLOCK, Props::new()),
            ItemSize::TwoByTwo,
        ));
        assert_filter_invariant(&h);

        h.app.grid.set_current_group("default_work").unwrap();
        let b = h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::LINK_CARD, Props::new()),
            ItemSize::OneByOne,
        ));
        assert_filter_invariant(&h);
        assert_eq!(h.app.grid.current_items().len(), 1);

        h.app
            .grid
            .update_item(&a, &GridItemPatch { group_id: Some("default_work".into()), ..Default::default() });
        assert_filter_invariant(&h);
        assert_eq!(h.app.grid.current_items().len(), 2);

        assert!(h.app.grid.remove_item(&b));
        assert!(!h.app.grid.remove_item(&b));
        assert_filter_invariant(&h);
    }

    #[tokio::test]
    async fn test_update_item_merges_props() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.persister.flush().await;

        let changed = h
            .app
            .grid
            .update_item("1", &GridItemPatch::props(props(json!({ "name": "GitHub Home" }))));
        assert!(changed);
        let item = h.app.grid.find_item("1").unwrap();
        let merged = item.widget.props();
        assert_eq!(merged["name"], json!("GitHub Home"));
        assert_eq!(merged["url"], json!("https://github.com"));
        assert_eq!(item.size, ItemSize::OneByOne);
        assert_eq!(h.persister.flush().await, 1);

        // Same values again: no change, no write
        assert!(!h
            .app
            .grid
            .update_item("1", &GridItemPatch::props(props(json!({ "name": "GitHub Home" })))));
        assert!(!h.app.grid.update_item("missing", &GridItemPatch::size(ItemSize::TwoByTwo)));
        assert_eq!(h.persister.flush().await, 0);
    }

    #[tokio::test]
    async fn test_set_current_group_persists_and_validates() {
        let mut h = harness();
        h.app.init().await.unwrap();

        h.app.grid.set_current_group("default_work").unwrap();
        h.persister.flush().await;
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_CURRENT_GROUP], json!("default_work"));

        let err = h.app.grid.set_current_group("nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(h.app.grid.current_group_id(), "default_work");
    }

    #[tokio::test]
    async fn test_remove_work_group_on_defaults() {
        let h = harness();
        h.app.init().await.unwrap();
        let items_before = h.app.grid.items();

        h.app.grid.remove_group("default_work").unwrap();

        let groups: Vec<String> = h.app.grid.groups().into_iter().map(|g| g.id).collect();
        assert_eq!(groups, vec!["default_home"]);
        assert_eq!(h.app.grid.items(), items_before);
        assert_eq!(h.app.grid.current_group_id(), "default_home");
    }

    #[tokio::test]
    async fn test_remove_default_group_is_forbidden() {
        let h = harness();
        h.app.init().await.unwrap();
        let before = h.app.grid.snapshot();

        let err = h.app.grid.remove_group("default_home").unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
        assert!(matches!(h.app.grid.remove_group("nope"), Err(StoreError::NotFound(_))));
        assert_eq!(h.app.grid.snapshot(), before);
    }

    #[tokio::test]
    async fn test_remove_active_group_cascades_and_falls_back() {
        let mut h = harness();
        h.app.init().await.unwrap();
        let group = h.app.grid.add_group(NewGroup {
            name: "Reading".into(),
            icon: "ri-book-line".into(),
        });
        h.app.grid.set_current_group(&group).unwrap();
        for _ in 0..2 {
            h.app.grid.add_item(NewGridItem::new(
                Widget::from_parts(Widget::LINK_CARD, Props::new()),
                ItemSize::OneByOne,
            ));
        }
        assert_eq!(h.app.grid.items().len(), 5);

        h.app.grid.remove_group(&group).unwrap();
        assert_eq!(h.app.grid.items().len(), 3);
        assert_eq!(h.app.grid.current_group_id(), "default_home");
        assert_filter_invariant(&h);

        h.persister.flush().await;
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_CURRENT_GROUP], json!("default_home"));
        assert_eq!(local[KEY_GROUPS].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_reorder_groups_requires_default() {
        let h = harness();
        h.app.init().await.unwrap();
        let mut groups = h.app.grid.groups();
        groups.reverse();

        h.app.grid.reorder_groups(groups.clone()).unwrap();
        assert_eq!(h.app.grid.groups()[0].id, "default_work");

        let err = h
            .app
            .grid
            .reorder_groups(vec![Group::new("default_work", "Work", "i")])
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(h.app.grid.groups(), groups);
    }

    #[tokio::test]
    async fn test_reorder_current_items_keeps_other_groups() {
        let h = harness();
        h.app.init().await.unwrap();
        h.app.grid.set_current_group("default_work").unwrap();
        let work = h.app.grid.add_item(NewGridItem::new(
            Widget::from_parts(Widget::CLOCK, Props::new()),
            ItemSize::OneByOne,
        ));
        h.app.grid.set_current_group("default_home").unwrap();

        let mut sorted = h.app.grid.current_items();
        sorted.reverse();
        h.app.grid.reorder_current_items(sorted);

        let ids: Vec<String> = h.app.grid.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![work, "3".to_string(), "2".to_string(), "1".to_string()]);
    }

    #[tokio::test]
    async fn test_restore_falls_back_when_active_group_vanishes() {
        let h = harness();
        h.app.init().await.unwrap();
        h.app.grid.set_current_group("default_work").unwrap();

        h.app.grid.restore(crate::store::GridRestore {
            groups: Some(vec![Group::new("solo", "Solo", "i")]),
            items: Some(Vec::new()),
            current_group_id: Some("missing".into()),
        });

        let groups = h.app.grid.groups();
        assert!(groups[0].is_default());
        assert_eq!(h.app.grid.current_group_id(), "solo");
        assert!(h.app.grid.items().is_empty());
    }

    // ========================
    // Settings
    // ========================

    #[tokio::test]
    async fn test_settings_per_field_fallback() {
        let storage = MemoryStorage::new();
        seed_local(
            &storage,
            json!({
                KEY_TITLE: "My Tab",
                "fins_bg_mode": "video",
                KEY_SEARCH_ENGINES: "not a list",
                KEY_CURRENT_ENGINE: 2
            }),
        )
        .await;
        let h = harness_with(storage, StoreConfig::default());
        h.app.init().await.unwrap();

        let settings = h.app.settings.settings();
        assert_eq!(settings.title, "My Tab");
        assert_eq!(settings.bg_mode, BgMode::Bing);
        assert_eq!(settings.search_engines.len(), 4);
        assert_eq!(settings.current_engine_index, 2);
        assert!(!settings.sync_enabled);
    }

    #[tokio::test]
    async fn test_setters_persist_preference_keys() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.persister.flush().await;

        h.app.settings.set_title("");
        assert_eq!(h.persister.flush().await, 0);

        h.app.settings.set_title("Start");
        h.app.settings.set_bg_mode(BgMode::Custom);
        h.app.settings.set_custom_bg_url("https://img.example/bg.jpg");
        assert_eq!(h.persister.flush().await, 1);

        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_TITLE], json!("Start"));
        assert_eq!(local["fins_bg_mode"], json!("custom"));
        assert_eq!(local["fins_custom_bg_url"], json!("https://img.example/bg.jpg"));
        assert_eq!(local["fins_sync_enabled"], json!(false));
    }

    #[tokio::test]
    async fn test_remove_engine_resets_selection() {
        let h = harness();
        h.app.init().await.unwrap();

        h.app.settings.set_current_engine(2).unwrap();
        h.app.settings.remove_engine(3).unwrap();
        assert_eq!(h.app.settings.settings().current_engine_index, 2);

        h.app.settings.remove_engine(1).unwrap();
        assert_eq!(h.app.settings.settings().current_engine_index, 0);
        assert!(matches!(h.app.settings.remove_engine(9), Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_engine_persists_list() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.persister.flush().await;

        let ddg = SearchEngine::new("DDG", "ri-search-line", "https://duckduckgo.com/?q=");
        h.app.settings.update_engine(0, ddg.clone()).unwrap();
        assert_eq!(h.app.settings.settings().search_engines[0], ddg);
        assert!(matches!(
            h.app.settings.update_engine(9, ddg.clone()),
            Err(StoreError::NotFound(_))
        ));

        assert_eq!(h.persister.flush().await, 1);
        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local[KEY_SEARCH_ENGINES][0]["name"], json!("DDG"));
    }

    #[tokio::test]
    async fn test_last_engine_cannot_be_removed() {
        let config = StoreConfig {
            default_engines: vec![SearchEngine::new("Bing", "i", "https://www.bing.com/search?q=")],
            ..StoreConfig::default()
        };
        let h = harness_with(MemoryStorage::new(), config);
        h.app.init().await.unwrap();

        let err = h.app.settings.remove_engine(0).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
        assert_eq!(h.app.settings.settings().search_engines.len(), 1);
        assert_eq!(toast_messages(&h.app), vec!["Keep at least one engine."]);
    }

    #[tokio::test]
    async fn test_search_url_uses_selected_engine() {
        let h = harness();
        h.app.init().await.unwrap();
        h.app.settings.set_current_engine(3).unwrap();
        assert_eq!(
            h.app.settings.search_url("leptos stores").as_deref(),
            Some("https://github.com/search?q=leptos%20stores")
        );
        assert!(h.app.settings.set_current_engine(4).is_err());
    }

    #[tokio::test]
    async fn test_configured_sync_quota_reaches_settings_and_storage() {
        let config = StoreConfig {
            sync_quota: 2048,
            ..StoreConfig::default()
        };
        let mut h = harness_with(MemoryStorage::for_config(&config), config);
        h.app.init().await.unwrap();
        h.persister.flush().await;

        assert_eq!(h.app.settings.settings().sync_quota, 2048);
        h.app.settings.set_sync_enabled(true).await;
        let usage = h.app.settings.settings().sync_usage;
        assert_eq!(
            h.app.settings.settings().sync_usage_ratio(),
            (usage as f64 / 2048.0).min(1.0)
        );

        let oversized = crate::repository::single_item("big", json!("x".repeat(4096)));
        let err = h.storage.set(oversized, StorageArea::Sync).await.unwrap_err();
        assert!(matches!(
            err,
            crate::repository::StorageError::QuotaExceeded { quota: 2048, .. }
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_stored_engine_index_is_ignored() {
        let storage = MemoryStorage::new();
        seed_local(&storage, json!({ KEY_CURRENT_ENGINE: 4_294_967_297u64 })).await;
        let h = harness_with(storage, StoreConfig::default());
        h.app.init().await.unwrap();
        assert_eq!(h.app.settings.settings().current_engine_index, 0);
    }

    #[tokio::test]
    async fn test_sync_usage_failure_keeps_value() {
        let h = harness();
        h.app.init().await.unwrap();
        h.storage
            .set(crate::repository::single_item("k", json!("v")), StorageArea::Sync)
            .await
            .unwrap();
        h.app.settings.update_sync_usage().await;
        assert_eq!(h.app.settings.settings().sync_usage, 4);

        h.storage.set_unavailable(true);
        h.app.settings.update_sync_usage().await;
        assert_eq!(h.app.settings.settings().sync_usage, 4);
    }

    // ========================
    // Sync mirror
    // ========================

    #[tokio::test]
    async fn test_grid_changes_mirror_to_sync_when_enabled() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.persister.flush().await;
        assert!(h.storage.snapshot(StorageArea::Sync).is_empty());

        h.app.settings.set_sync_enabled(true).await;
        h.app.grid.remove_item("2");
        h.persister.flush().await;

        let sync = h.storage.snapshot(StorageArea::Sync);
        let blob = sync[KEY_COMPRESSED].as_str().unwrap();
        let payload = decode_payload(blob).unwrap();
        assert_eq!(payload[KEY_ITEMS].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["platform"], json!("fins-extension"));
        assert!(h.app.settings.settings().sync_usage > 0);

        let local = h.storage.snapshot(StorageArea::Local);
        assert_eq!(local["fins_sync_enabled"], json!(true));
    }

    #[tokio::test]
    async fn test_settings_changes_do_not_touch_sync() {
        let mut h = harness();
        h.app.init().await.unwrap();
        h.app.settings.set_sync_enabled(true).await;
        h.persister.flush().await;
        let before = h.storage.snapshot(StorageArea::Sync);

        h.app.settings.set_title("Other");
        h.persister.flush().await;
        assert_eq!(h.storage.snapshot(StorageArea::Sync), before);
    }
}
