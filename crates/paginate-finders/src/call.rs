//! Finder call resolution.
//!
//! A paginated lookup names the finder it wraps: the plain finder, an
//! attribute finder (`paginate_by_author_and_state`) or any other named
//! finder (`paginate_tagged_with`). [`FinderCall::from_method`] maps the
//! `paginate*` method name onto the `find*` finder it stands for.

use std::sync::LazyLock;

use regex::Regex;

use paginate_core::error::PaginateError;
use paginate_core::result::PaginateResult;
use paginate_core::types::Value;

static ATTRIBUTE_FINDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^find_(?:all_by|by)_([_a-zA-Z]\w*)$").expect("valid attribute finder pattern")
});

/// The finder a paginated lookup delegates to.
#[derive(Debug, Clone, PartialEq)]
pub enum FinderCall {
    /// `find(:all)`.
    All,
    /// `find(ids)`: the id list doubles as the total.
    Ids(Vec<Value>),
    /// `find_all_by_<a>_and_<b>(va, vb)`.
    ByAttributes {
        /// Attribute names, in call order.
        attributes: Vec<String>,
        /// One value per attribute.
        values: Vec<Value>,
    },
    /// Any other `find_*` finder.
    Named {
        /// Full finder name, e.g. `find_tagged_with`.
        name: String,
        /// Positional arguments.
        args: Vec<Value>,
    },
}

impl FinderCall {
    /// Resolve a `paginate*` method name and its positional arguments.
    pub fn from_method(method: &str, args: Vec<Value>) -> PaginateResult<Self> {
        let Some(rest) = method.strip_prefix("paginate") else {
            return Err(PaginateError::invalid_argument(format!(
                "`{method}` is not a paginating finder"
            )));
        };

        let mut finder = format!("find{rest}");
        if finder.starts_with("find_by_") {
            finder = finder.replacen("find", "find_all", 1);
        }

        if finder == "find" {
            return Ok(match args.into_iter().next() {
                Some(Value::List(ids)) => Self::Ids(ids),
                _ => Self::All,
            });
        }

        if let Some(captures) = ATTRIBUTE_FINDER.captures(&finder) {
            let attributes: Vec<String> = captures[1]
                .split("_and_")
                .map(str::to_string)
                .collect();
            if attributes.len() != args.len() {
                return Err(PaginateError::invalid_argument(format!(
                    "`{method}` expects {} argument(s), got {}",
                    attributes.len(),
                    args.len()
                )));
            }
            return Ok(Self::ByAttributes {
                attributes,
                values: args,
            });
        }

        Ok(Self::Named { name: finder, args })
    }

    /// The underlying finder name.
    pub fn finder_name(&self) -> String {
        match self {
            Self::All | Self::Ids(_) => "find".to_string(),
            Self::ByAttributes { attributes, .. } => {
                format!("find_all_by_{}", attributes.join("_and_"))
            }
            Self::Named { name, .. } => name.clone(),
        }
    }

    /// The `with_*` scope name that may wrap this finder's count.
    pub fn scope_name(&self) -> Option<String> {
        let name = self.finder_name();
        name.starts_with("find_")
            .then(|| name.replacen("find", "with", 1))
    }

    /// `(attribute, value)` pairs for attribute finders.
    pub fn attribute_pairs(&self) -> Vec<(String, Value)> {
        match self {
            Self::ByAttributes { attributes, values } => attributes
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }
}
