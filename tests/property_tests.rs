//! Property-based tests for the category scopes and their supporting types.

mod common;

use category_service::config::AppConfig;
use category_service::entities::category::Entity as Category;
use category_service::handlers::common::PaginationMeta;
use category_service::queries::{CategoryFilter, CategoryScopes, CategorySort, SortDirection};
use category_service::repositories::{NewCategory, Repository};
use proptest::prelude::*;
use sea_orm::{DbBackend, EntityTrait, QueryTrait};

fn case_variants(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(ch, up)| if up { ch.to_ascii_uppercase() } else { ch })
            .collect()
    })
}

fn category_type_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("news"), Just("blog"), Just("page")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn direction_parsing_ignores_case(raw in prop_oneof![case_variants("asc"), case_variants("desc")]) {
        let parsed: SortDirection = raw.parse().expect("known direction rejected");
        let expected = if raw.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        prop_assert_eq!(parsed, expected);
        prop_assert_eq!(parsed.reverse().reverse(), parsed);
    }

    #[test]
    fn direction_parsing_rejects_everything_else(raw in "[a-zA-Z]{0,8}") {
        prop_assume!(!raw.eq_ignore_ascii_case("asc") && !raw.eq_ignore_ascii_case("desc"));
        prop_assert!(raw.parse::<SortDirection>().is_err());
    }

    #[test]
    fn total_pages_cover_total(total in 0u64..100_000, per_page in 1u64..1_000) {
        let meta = PaginationMeta::new(1, per_page, total);
        prop_assert!(meta.total_pages * per_page >= total);
        if meta.total_pages > 0 {
            prop_assert!((meta.total_pages - 1) * per_page < total);
        }
    }

    #[test]
    fn clamped_page_size_stays_in_bounds(requested in proptest::option::of(0u64..10_000), max in 1u64..1_000) {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        cfg.api_max_page_size = max;
        cfg.api_default_page_size = max.min(20);

        let size = cfg.clamp_page_size(requested);
        prop_assert!(size >= 1 && size <= max);
    }

    #[test]
    fn usage_sorts_always_break_ties_by_id(
        most in any::<bool>(),
        direction in prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    ) {
        let sort = if most { CategorySort::MostUsed } else { CategorySort::LeastUsed };
        let sql = CategoryFilter::default()
            .sorted(sort, Some(direction))
            .apply(Category::find())
            .build(DbBackend::Sqlite)
            .to_string();
        prop_assert!(sql.ends_with(r#", "categories"."id" ASC"#));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn predicate_scopes_return_exactly_matching_rows(
        rows in proptest::collection::vec((category_type_strategy(), any::<bool>(), any::<bool>()), 0..12),
        wanted in category_type_strategy(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let repo = common::repository(common::setup_db().await);
            for (i, (kind, hot, published)) in rows.iter().enumerate() {
                let mut input = NewCategory::new(format!("C{i}"), *kind);
                input.is_hot = *hot;
                if *published {
                    input = input.published();
                }
                common::seed(&repo, input).await;
            }

            let of_type = Category::find().of_type(wanted).all(repo.get_db()).await.unwrap();
            let expected = rows.iter().filter(|(kind, _, _)| *kind == wanted).count();
            prop_assert_eq!(of_type.len(), expected);
            prop_assert!(of_type.iter().all(|c| c.category_type == wanted));

            let hot = Category::find().is_hot().all(repo.get_db()).await.unwrap();
            let hot_twice = Category::find().is_hot().is_hot().all(repo.get_db()).await.unwrap();
            prop_assert_eq!(hot.len(), rows.iter().filter(|(_, h, _)| *h).count());
            prop_assert_eq!(&hot, &hot_twice);

            let published = Category::find().is_published().all(repo.get_db()).await.unwrap();
            prop_assert_eq!(published.len(), rows.iter().filter(|(_, _, p)| *p).count());
            Ok(())
        })?;
    }
}
