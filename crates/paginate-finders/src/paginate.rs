//! The paginating finders.

use async_trait::async_trait;
use tracing::debug;

use paginate_core::result::PaginateResult;
use paginate_core::traits::Model;
use paginate_core::traits::model::qualify;
use paginate_core::types::{Collection, PaginateOptions, SqlQuery, Value};

use crate::call::FinderCall;
use crate::count::count_for;
use crate::sql;

/// Pagination for every [`Model`].
///
/// Each finder translates `page`/`per_page` into `limit`/`offset`, runs the
/// model's finder once, and only issues a count query when the total
/// cannot be inferred from the page itself. Options are borrowed and never
/// modified.
#[async_trait]
pub trait Paginate: Model {
    /// Paginate the plain finder.
    async fn paginate(
        &self,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>>;

    /// Paginate an explicit finder call.
    async fn paginate_with(
        &self,
        call: &FinderCall,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>>;

    /// Paginate the finder named by a `paginate*` method, e.g.
    /// `paginate_by_author` or `paginate_tagged_with`.
    async fn paginate_method(
        &self,
        method: &str,
        args: Vec<Value>,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>>;

    /// Paginate a raw select statement.
    ///
    /// Only `page`, `per_page` and `total_entries` are read from `options`.
    async fn paginate_by_sql(
        &self,
        query: &SqlQuery,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>>;

    /// Visit every record page by page, returning how many were visited.
    ///
    /// Pages are ordered by primary key unless `options` orders them, and
    /// no count queries are issued.
    async fn paginated_each<F>(&self, options: &PaginateOptions, f: F) -> PaginateResult<u64>
    where
        F: FnMut(Self::Record) + Send;
}

#[async_trait]
impl<M: Model> Paginate for M {
    async fn paginate(
        &self,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>> {
        paginate_call(self, &FinderCall::All, options).await
    }

    async fn paginate_with(
        &self,
        call: &FinderCall,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>> {
        paginate_call(self, call, options).await
    }

    async fn paginate_method(
        &self,
        method: &str,
        args: Vec<Value>,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>> {
        let call = FinderCall::from_method(method, args)?;
        paginate_call(self, &call, options).await
    }

    async fn paginate_by_sql(
        &self,
        query: &SqlQuery,
        options: &PaginateOptions,
    ) -> PaginateResult<Collection<Self::Record>> {
        let mut pager = new_pager(self, options)?;
        let dialect = self.dialect();

        debug!(
            table = self.table_name(),
            page = pager.current_page(),
            per_page = pager.per_page(),
            "Paginating raw SQL"
        );

        let limited = sql::add_limit(query, pager.per_page(), pager.offset(), dialect);
        pager.replace(self.find_by_sql(&limited).await?);

        if pager.total_entries().is_none() {
            let count = sql::count_query(query, dialect);
            pager.set_total_entries(self.count_by_sql(&count).await?);
        }

        Ok(pager)
    }

    async fn paginated_each<F>(&self, options: &PaginateOptions, mut f: F) -> PaginateResult<u64>
    where
        F: FnMut(Self::Record) + Send,
    {
        let mut options = options.clone();
        if options.query.order.is_none() {
            options.query.order = Some(qualify(self.table_name(), self.primary_key()));
        }
        options.total_entries = Some(0);

        let mut page = options.page.unwrap_or(1);
        let mut visited = 0u64;
        loop {
            options.page = Some(page);
            let collection = paginate_call(self, &FinderCall::All, &options).await?;
            let per_page = collection.per_page();
            let len = collection.len() as u64;

            visited += len;
            collection.into_iter().for_each(&mut f);

            if len < per_page {
                break;
            }
            page += 1;
        }

        debug!(table = self.table_name(), visited, "Finished paginated iteration");
        Ok(visited)
    }
}

fn new_pager<M: Model, T>(model: &M, options: &PaginateOptions) -> PaginateResult<Collection<T>> {
    let per_page = options
        .per_page
        .unwrap_or_else(|| i64::try_from(model.per_page()).unwrap_or(i64::MAX));
    Collection::new(options.page.unwrap_or(1), per_page, options.total_entries)
}

async fn paginate_call<M: Model>(
    model: &M,
    call: &FinderCall,
    options: &PaginateOptions,
) -> PaginateResult<Collection<M::Record>> {
    let mut pager = new_pager(model, options)?;

    let mut find = options.query.clone();
    find.limit = Some(pager.per_page());
    find.offset = Some(pager.offset());

    debug!(
        table = model.table_name(),
        finder = %call.finder_name(),
        page = pager.current_page(),
        per_page = pager.per_page(),
        "Paginating"
    );

    let records = match call {
        FinderCall::All => model.find_all(&find).await?,
        FinderCall::Ids(ids) => {
            if pager.total_entries().is_none() {
                pager.set_total_entries(ids.len() as u64);
            }
            model.find_ids(ids, &find).await?
        }
        FinderCall::ByAttributes { .. } => {
            model
                .find_by_attributes(&call.attribute_pairs(), &find)
                .await?
        }
        FinderCall::Named { name, args } => model.call_finder(name, args, &find).await?,
    };
    pager.replace(records);

    if pager.total_entries().is_none() {
        let total = count_for(model, call, options).await?;
        pager.set_total_entries(total);
    }

    Ok(pager)
}
