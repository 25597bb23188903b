//! Finder translation tests against a recording model.

use paginate::paginate_core::error::ErrorKind;
use paginate::prelude::*;

use crate::helpers::{Call, RecordingModel};

fn window(limit: u64, offset: u64) -> FindOptions {
    FindOptions::new().limit(limit).offset(offset)
}

#[tokio::test]
async fn test_paginate_translates_page_into_limit_and_offset() {
    let model = RecordingModel::new("ar_projects");

    let page = model
        .paginate(&PaginateOptions::page(1).per_page(5))
        .await
        .expect("paginate");

    assert_eq!(model.calls(), vec![Call::FindAll(window(5, 0))]);
    assert_eq!(page.current_page(), 1);
    assert_eq!(page.total_entries(), Some(0));
}

#[tokio::test]
async fn test_missing_page_means_first_page_with_default_size() {
    let model = RecordingModel::new("ar_projects");

    let page = model
        .paginate(&PaginateOptions::default())
        .await
        .expect("paginate");

    assert_eq!(page.current_page(), 1);
    assert_eq!(page.per_page(), 30);
    assert_eq!(model.calls(), vec![Call::FindAll(window(30, 0))]);
}

#[tokio::test]
async fn test_attribute_finder_counts_with_attribute_conditions() {
    let model = RecordingModel::new("ar_projects");

    model
        .paginate_method("paginate_by_foo", vec![Value::from("bar")], &PaginateOptions::page(2))
        .await
        .expect("paginate_by_foo");

    assert_eq!(
        model.calls(),
        vec![
            Call::FindByAttributes(
                vec![("foo".to_string(), Value::from("bar"))],
                window(30, 30)
            ),
            Call::Count(FindOptions::new().where_eq("ar_projects.foo", "bar")),
        ]
    );
}

#[tokio::test]
async fn test_extra_options_reach_finder_and_count() {
    let model = RecordingModel::new("ar_projects").returning(5).counting(12);
    let options = PaginateOptions::page(1)
        .per_page(4)
        .query(FindOptions::new().with("foo", "bar"));

    let page = model.paginate(&options).await.expect("paginate");

    assert_eq!(
        model.calls(),
        vec![
            Call::FindAll(window(4, 0).with("foo", "bar")),
            Call::Count(FindOptions::new().with("foo", "bar")),
        ]
    );
    assert_eq!(page.total_entries(), Some(12));
    assert_eq!(page.total_pages(), Some(3));
}

#[tokio::test]
async fn test_short_page_infers_total_without_count() {
    let model = RecordingModel::new("ar_projects").table_of(6);

    let page = model
        .paginate(&PaginateOptions::page(2).per_page(4))
        .await
        .expect("paginate");

    assert_eq!(page.len(), 2);
    assert_eq!(page.total_entries(), Some(6));
    assert_eq!(page.total_pages(), Some(2));
    assert!(model.count_calls().is_empty());
}

#[tokio::test]
async fn test_empty_page_past_the_first_still_counts() {
    let model = RecordingModel::new("ar_projects").counting(3);

    let page = model
        .paginate(&PaginateOptions::page(3).per_page(4))
        .await
        .expect("paginate");

    assert!(page.is_empty());
    assert_eq!(page.total_entries(), Some(3));
    assert!(page.out_of_bounds());
    assert_eq!(model.count_calls().len(), 1);
}

#[tokio::test]
async fn test_distinct_select_is_kept_for_count() {
    let model = RecordingModel::new("ar_projects").returning(5).counting(4);
    let options = PaginateOptions::page(1)
        .per_page(5)
        .query(FindOptions::new().select("DISTINCT salary"));

    model.paginate(&options).await.expect("paginate");

    assert_eq!(
        model.count_calls(),
        vec![Call::Count(FindOptions::new().select("DISTINCT salary"))]
    );
}

#[tokio::test]
async fn test_plain_select_is_dropped_for_count() {
    let model = RecordingModel::new("ar_projects").returning(5);
    let options = PaginateOptions::page(1)
        .per_page(5)
        .query(FindOptions::new().select("id, name").order("name").readonly(true));

    model.paginate(&options).await.expect("paginate");

    assert_eq!(model.count_calls(), vec![Call::Count(FindOptions::new())]);
}

#[tokio::test]
async fn test_distinct_table_wildcard_counts_primary_key() {
    let model = RecordingModel::new("ar_projects").returning(5);
    let options = PaginateOptions::page(1)
        .per_page(5)
        .query(FindOptions::new().select("DISTINCT `ar_projects`.*"));

    model.paginate(&options).await.expect("paginate");

    assert_eq!(
        model.count_calls(),
        vec![Call::Count(FindOptions::new().select("DISTINCT ar_projects.id"))]
    );
}

#[tokio::test]
async fn test_named_finder_counts_in_matching_scope() {
    let model = RecordingModel::new("ar_projects")
        .returning(5)
        .with_finder("find_best")
        .with_scope("with_best");

    model
        .paginate_method("paginate_best", vec![], &PaginateOptions::page(1).per_page(5))
        .await
        .expect("paginate_best");

    assert_eq!(
        model.calls(),
        vec![
            Call::Finder("find_best".to_string(), vec![], window(5, 0)),
            Call::CountInScope("with_best".to_string(), FindOptions::new()),
        ]
    );
}

#[tokio::test]
async fn test_named_finder_without_scope_uses_plain_count() {
    let model = RecordingModel::new("ar_projects")
        .returning(5)
        .with_finder("find_tagged_with");

    model
        .paginate_method(
            "paginate_tagged_with",
            vec![Value::from("rust")],
            &PaginateOptions::page(2).per_page(5),
        )
        .await
        .expect("paginate_tagged_with");

    assert_eq!(
        model.calls(),
        vec![
            Call::Finder(
                "find_tagged_with".to_string(),
                vec![Value::from("rust")],
                window(5, 5)
            ),
            Call::Count(FindOptions::new()),
        ]
    );
}

#[tokio::test]
async fn test_attribute_finder_with_id_list_still_counts() {
    let model = RecordingModel::new("ar_projects").returning(3).counting(5);
    let ids = Value::from(vec![1, 2, 3, 4, 5]);
    let options = PaginateOptions::page(2)
        .per_page(3)
        .query(FindOptions::new().order("id"));

    let page = model
        .paginate_method("paginate_by_id", vec![ids.clone()], &options)
        .await
        .expect("paginate_by_id");

    assert_eq!(
        model.calls(),
        vec![
            Call::FindByAttributes(vec![("id".to_string(), ids.clone())], window(3, 3).order("id")),
            Call::Count(FindOptions::new().where_eq("ar_projects.id", ids)),
        ]
    );
    assert_eq!(page.total_pages(), Some(2));
}

#[tokio::test]
async fn test_id_list_is_its_own_total() {
    let model = RecordingModel::new("ar_projects").returning(2);

    let page = model
        .paginate_method(
            "paginate",
            vec![Value::from(vec![1, 2, 3])],
            &PaginateOptions::page(1).per_page(2),
        )
        .await
        .expect("paginate ids");

    assert_eq!(page.total_entries(), Some(3));
    assert_eq!(page.total_pages(), Some(2));
    assert!(model.count_calls().is_empty());
    assert!(matches!(model.calls()[0], Call::FindIds(ref ids, _) if ids.len() == 3));
}

#[tokio::test]
async fn test_known_total_skips_count() {
    let model = RecordingModel::new("ar_projects").returning(5);

    let page = model
        .paginate(&PaginateOptions::page(1).per_page(5).total_entries(999))
        .await
        .expect("paginate");

    assert_eq!(page.total_entries(), Some(999));
    assert_eq!(page.total_pages(), Some(200));
    assert!(model.count_calls().is_empty());
}

#[tokio::test]
async fn test_options_are_not_modified() {
    let model = RecordingModel::new("ar_projects").returning(5);
    let options = PaginateOptions::page(2)
        .per_page(5)
        .query(FindOptions::new().order("id").select("DISTINCT `ar_projects`.*"))
        .count(FindOptions::new().where_sql("1 = 1"));
    let before = options.clone();

    model.paginate(&options).await.expect("paginate");
    model
        .paginate_by_sql(&SqlQuery::new("sql ORDER BY id"), &options)
        .await
        .expect("paginate_by_sql");

    assert_eq!(options, before);
}

#[tokio::test]
async fn test_unreferenced_include_is_dropped_for_count() {
    let model = RecordingModel::new("developers").returning(5);
    let options = PaginateOptions::page(1).per_page(5).query(
        FindOptions::new()
            .include("projects")
            .where_sql("developers.salary > 10000"),
    );

    model.paginate(&options).await.expect("paginate");

    assert_eq!(
        model.count_calls(),
        vec![Call::Count(
            FindOptions::new().where_sql("developers.salary > 10000")
        )]
    );
}

#[tokio::test]
async fn test_referenced_include_is_kept_for_count() {
    let model = RecordingModel::new("developers").returning(5);
    let query = FindOptions::new()
        .include("projects")
        .where_sql("projects.id > 2");
    let options = PaginateOptions::page(1).per_page(5).query(query.clone());

    model.paginate(&options).await.expect("paginate");

    assert_eq!(model.count_calls(), vec![Call::Count(query)]);
}

#[tokio::test]
async fn test_count_overrides_are_merged() {
    let model = RecordingModel::new("developers").returning(5);
    let options = PaginateOptions::page(1)
        .per_page(5)
        .query(FindOptions::new().where_sql("salary > 1").order("name"))
        .count(FindOptions::new().select("DISTINCT salary"));

    model.paginate(&options).await.expect("paginate");

    assert_eq!(
        model.calls(),
        vec![
            Call::FindAll(window(5, 0).where_sql("salary > 1").order("name")),
            Call::Count(
                FindOptions::new()
                    .where_sql("salary > 1")
                    .select("DISTINCT salary")
            ),
        ]
    );
}

#[tokio::test]
async fn test_paginate_by_sql_appends_window_and_wraps_count() {
    let model = RecordingModel::new("ar_projects").returning(3).counting(10);

    let page = model
        .paginate_by_sql(&SqlQuery::new("sql"), &PaginateOptions::page(2).per_page(3))
        .await
        .expect("paginate_by_sql");

    assert_eq!(
        model.calls(),
        vec![
            Call::FindBySql(SqlQuery::new("sql LIMIT 3 OFFSET 3")),
            Call::CountBySql(SqlQuery::new("SELECT COUNT(*) FROM (sql) AS count_table")),
        ]
    );
    assert_eq!(page.total_pages(), Some(4));
}

#[tokio::test]
async fn test_paginate_by_sql_strips_order_from_count() {
    let model = RecordingModel::new("topics").returning(3);
    let query = SqlQuery::with_params(
        "SELECT * FROM topics WHERE id > ? ORDER BY created_at DESC",
        vec![Value::from(1)],
    );

    model
        .paginate_by_sql(&query, &PaginateOptions::page(1).per_page(3))
        .await
        .expect("paginate_by_sql");

    assert_eq!(
        model.count_calls(),
        vec![Call::CountBySql(SqlQuery::with_params(
            "SELECT COUNT(*) FROM (SELECT * FROM topics WHERE id > ? ) AS count_table",
            vec![Value::from(1)],
        ))]
    );
}

#[tokio::test]
async fn test_paginate_by_sql_with_known_total() {
    let model = RecordingModel::new("ar_projects").returning(3);

    let page = model
        .paginate_by_sql(
            &SqlQuery::new("sql"),
            &PaginateOptions::page(1).per_page(3).total_entries(999),
        )
        .await
        .expect("paginate_by_sql");

    assert_eq!(page.total_pages(), Some(333));
    assert!(model.count_calls().is_empty());
}

#[tokio::test]
async fn test_invalid_page_parameters_are_rejected_before_querying() {
    let model = RecordingModel::new("ar_projects");

    for options in [PaginateOptions::page(0), PaginateOptions::page(-1)] {
        let err = model.paginate(&options).await.expect_err("invalid page");
        assert_eq!(err.kind, ErrorKind::InvalidPage);
    }

    let err = model
        .paginate(&PaginateOptions::page(i64::MAX))
        .await
        .expect_err("page beyond any offset");
    assert_eq!(err.kind, ErrorKind::InvalidPage);

    let err = model
        .paginate_by_sql(&SqlQuery::new("sql"), &PaginateOptions::page(i64::MAX).per_page(2))
        .await
        .expect_err("page beyond any offset");
    assert_eq!(err.kind, ErrorKind::InvalidPage);

    let err = model
        .paginate(&PaginateOptions::page(1).per_page(0))
        .await
        .expect_err("invalid per_page");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_finder_is_reported() {
    let model = RecordingModel::new("ar_projects");

    let err = model
        .paginate_method("paginate_nonexistent", vec![], &PaginateOptions::page(1))
        .await
        .expect_err("unknown finder");
    assert_eq!(err.kind, ErrorKind::UnknownFinder);

    let err = model
        .paginate_method("index", vec![], &PaginateOptions::page(1))
        .await
        .expect_err("not a paginating method");
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_paginated_each_walks_every_page_without_counting() {
    let model = RecordingModel::new("ar_projects").table_of(7);
    let mut seen = Vec::new();

    let visited = model
        .paginated_each(&PaginateOptions::default().per_page(3), |id| seen.push(id))
        .await
        .expect("paginated_each");

    assert_eq!(visited, 7);
    assert_eq!(seen, (0..7).collect::<Vec<u32>>());
    assert_eq!(
        model.calls(),
        vec![
            Call::FindAll(window(3, 0).order("ar_projects.id")),
            Call::FindAll(window(3, 3).order("ar_projects.id")),
            Call::FindAll(window(3, 6).order("ar_projects.id")),
        ]
    );
}

#[tokio::test]
async fn test_paginated_each_keeps_caller_order_and_stops_on_empty_page() {
    let model = RecordingModel::new("ar_projects").table_of(6);
    let options = PaginateOptions::default()
        .per_page(3)
        .query(FindOptions::new().order("name"));

    let visited = model
        .paginated_each(&options, |_| {})
        .await
        .expect("paginated_each");

    assert_eq!(visited, 6);
    let calls = model.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2], Call::FindAll(window(3, 6).order("name")));
}

#[tokio::test]
async fn test_model_default_select_feeds_the_count() {
    let model = RecordingModel::new("ar_projects")
        .returning(5)
        .selecting("DISTINCT `ar_projects`.*");

    model
        .paginate(&PaginateOptions::page(1).per_page(5))
        .await
        .expect("paginate");

    assert_eq!(
        model.count_calls(),
        vec![Call::Count(FindOptions::new().select("DISTINCT ar_projects.id"))]
    );
}

#[tokio::test]
async fn test_caller_select_wins_over_model_default() {
    let model = RecordingModel::new("ar_projects")
        .returning(5)
        .selecting("DISTINCT `ar_projects`.*");
    let options = PaginateOptions::page(1)
        .per_page(5)
        .query(FindOptions::new().select("id, name"));

    model.paginate(&options).await.expect("paginate");

    assert_eq!(model.count_calls(), vec![Call::Count(FindOptions::new())]);
}
