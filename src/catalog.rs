//! Catalog data model
//!
//! Brands are configuration input, categories are discovered on brand pages
//! and product records are what the crawl produces.

use serde::Deserialize;

/// A top-level catalog partition with its own landing page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    /// Display name, used as the first half of the group key
    pub name: String,

    /// Absolute URL of the brand landing page
    pub url: String,
}

impl Brand {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A product grouping within a brand, backed by a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Visible anchor text, trimmed
    pub name: String,

    /// Absolute URL of the first listing page
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Fields pulled from a product detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: String,
    pub sku: String,
    pub price: String,
    pub comment: String,
}

/// One exported row
///
/// `brand` and `category` are always populated. The extracted fields may be
/// blank; a record whose extracted fields are all blank is a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub brand: String,
    pub category: String,
    pub sku: String,
    pub price: String,
    pub comment: String,
}

impl ProductRecord {
    /// Builds a record from extracted fields
    pub fn from_fields(brand: &str, category: &str, fields: ExtractedFields) -> Self {
        Self {
            brand: brand.to_string(),
            category: category.to_string(),
            sku: fields.sku,
            price: fields.price,
            comment: fields.comment,
        }
    }

    /// Builds a record with blank extracted fields
    pub fn placeholder(brand: &str, category: &str) -> Self {
        Self::from_fields(brand, category, ExtractedFields::default())
    }

    /// Returns true if none of the extracted fields carry a value
    pub fn is_placeholder(&self) -> bool {
        self.sku.is_empty() && self.price.is_empty() && self.comment.is_empty()
    }

    /// Key under which this record is grouped for export
    pub fn group_key(&self) -> String {
        format!("{} - {}", self.brand, self.category)
    }
}
