#[cfg(test)]
pub mod tests {
    use crate::models::ChartType;
    use crate::utils::fallback::{
        FALLBACK_REASONING, FALLBACK_SERIES_NAME, FALLBACK_TITLE, fallback,
    };
    use serde_json::json;

    #[test]
    fn test_mapping_keeps_key_order() {
        let analysis = fallback(&json!({ "Jan": 10, "Feb": 20 }), None);

        assert_eq!(analysis.categories, vec!["Jan", "Feb"]);
        assert_eq!(analysis.series.len(), 1);
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], vec![10.0, 20.0]);
    }

    #[test]
    fn test_mapping_order_is_not_alphabetical() {
        let analysis = fallback(&json!({ "Zulu": 1, "Alpha": 2, "Mike": 3 }), None);
        assert_eq!(analysis.categories, vec!["Zulu", "Alpha", "Mike"]);
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_numeric_mapping_value_shifts_later_values() {
        let analysis = fallback(&json!({ "a": "x", "b": 5, "c": 7 }), None);

        assert_eq!(analysis.categories, vec!["a", "b", "c"]);
        // "x" leaves no slot, so 5 and 7 line up with "a" and "b"
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], vec![5.0, 7.0]);
    }

    #[test]
    fn test_sequence_gets_item_categories() {
        let analysis = fallback(&json!([4, 8.5, 15]), None);

        assert_eq!(analysis.categories, vec!["Item 1", "Item 2", "Item 3"]);
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], vec![4.0, 8.5, 15.0]);
    }

    #[test]
    fn test_sequence_of_objects_collects_numeric_fields() {
        let data = json!([
            { "name": "North", "sales": 12 },
            { "name": "South", "sales": 7 },
            "skipped"
        ]);
        let analysis = fallback(&data, None);

        assert_eq!(analysis.categories, vec!["Item 1", "Item 2", "Item 3"]);
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], vec![12.0, 7.0]);
    }

    #[test]
    fn test_scalar_data_gives_empty_chart() {
        let analysis = fallback(&json!("just text"), None);
        assert!(analysis.categories.is_empty());
        assert_eq!(analysis.series[FALLBACK_SERIES_NAME], Vec::<f64>::new());
    }

    #[test]
    fn test_defaults_and_marker() {
        let analysis = fallback(&json!({ "a": 1 }), None);

        assert_eq!(analysis.chart_type, ChartType::Bar);
        assert_eq!(analysis.title, FALLBACK_TITLE);
        assert_eq!(analysis.x_axis_label, "Categories");
        assert_eq!(analysis.y_axis_label, "Values");
        assert_eq!(analysis.reasoning, FALLBACK_REASONING);
        assert!(analysis.is_fallback());
    }

    #[test]
    fn test_user_title_is_kept() {
        assert_eq!(fallback(&json!({}), Some("Sales")).title, "Sales");
        assert_eq!(fallback(&json!({}), Some("   ")).title, FALLBACK_TITLE);
    }
}
