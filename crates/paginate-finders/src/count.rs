//! Total-count queries for paginated finders.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use paginate_core::result::PaginateResult;
use paginate_core::traits::Model;
use paginate_core::traits::model::attribute_conditions;
use paginate_core::types::{FindOptions, PaginateOptions, is_distinct_select};

use crate::call::FinderCall;

static TABLE_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\.\*").expect("valid wildcard pattern"));

/// Derive the options for the count query from the finder options.
///
/// Ordering and windowing never change a count, so they are dropped. A
/// `DISTINCT` select is the only select that does, so every other select
/// is dropped too. Included tables only stay when the conditions need
/// their join. Finally the caller's count-only overrides are applied.
pub fn count_options<M: Model + ?Sized>(model: &M, options: &PaginateOptions) -> FindOptions {
    let mut count = options.query.clone();

    if count.select.is_none() {
        count.select = model.default_select();
    }
    let distinct = count
        .select
        .as_deref()
        .is_some_and(is_distinct_select);
    if !distinct {
        count.select = None;
    } else if count
        .select
        .as_deref()
        .is_some_and(|select| TABLE_WILDCARD.is_match(&select.replace('`', "")))
    {
        count.select = Some(format!(
            "DISTINCT {}.{}",
            model.table_name(),
            model.primary_key()
        ));
    }

    count.order = None;
    count.limit = None;
    count.offset = None;
    count.readonly = None;

    if let Some(overrides) = &options.count {
        count.merge(overrides);
    }

    if !count.include.is_empty() && !model.references_eager_loaded_tables(&count) {
        count.include.clear();
    }

    count
}

/// Count the records a paginated finder call can return in total.
pub async fn count_for<M: Model + ?Sized>(
    model: &M,
    call: &FinderCall,
    options: &PaginateOptions,
) -> PaginateResult<u64> {
    let mut count = count_options(model, options);

    if let Some(scope) = call.scope_name().filter(|scope| model.has_scope(scope)) {
        debug!(table = model.table_name(), scope = %scope, "Counting within scope");
        return model.count_in_scope(&scope, &count).await;
    }

    if let FinderCall::ByAttributes { .. } = call {
        count
            .conditions
            .extend(attribute_conditions(model.table_name(), &call.attribute_pairs()));
    }

    debug!(table = model.table_name(), finder = %call.finder_name(), "Counting total entries");
    model.count(&count).await
}
