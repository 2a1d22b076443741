use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::fields::{FieldReader, Mode, Payload, Text};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub category: String,
    pub author: String,
    pub pinned: bool,
    pub attachment_url: Option<String>,
    pub expires_at: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const CATEGORIES: [&str; 5] = ["General", "Exam", "Maintenance", "Event", "Emergency"];
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_AUTHOR: &str = "Admin";

/// Board order: pinned first, then newest first.
pub fn listing_order(a: &Model, b: &Model) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub pinned: Option<bool>,
    pub attachment_url: Option<Option<String>>,
    pub expires_at: Option<Option<NaiveDate>>,
}

impl NoticeFields {
    /// [`Mode::Create`] serves both POST and PUT: `title` and `body` must be present.
    pub fn from_payload(payload: &Payload, mode: Mode) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(payload, mode);
        let fields = NoticeFields {
            title: r.text("title", Text::required(255)),
            body: r.text("body", Text::required_text()),
            category: r.choice("category", &CATEGORIES, Text::optional_non_blank(32)),
            author: r.text("author", Text::optional_non_blank(120)),
            pinned: r.boolean("pinned"),
            attachment_url: r.nullable_url("attachment_url", 200),
            expires_at: r.nullable_date("expires_at"),
        };
        r.finish(fields)
    }

    pub fn into_new_model(self) -> Model {
        let now = Utc::now().into();
        let mut m = Model {
            id: Uuid::new_v4(),
            title: String::new(),
            body: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            pinned: false,
            attachment_url: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        };
        self.apply_to_model(&mut m);
        m
    }

    pub fn apply_to_model(self, m: &mut Model) {
        if let Some(v) = self.title { m.title = v; }
        if let Some(v) = self.body { m.body = v; }
        if let Some(v) = self.category { m.category = v; }
        if let Some(v) = self.author { m.author = v; }
        if let Some(v) = self.pinned { m.pinned = v; }
        if let Some(v) = self.attachment_url { m.attachment_url = v; }
        if let Some(v) = self.expires_at { m.expires_at = v; }
        m.updated_at = Utc::now().into();
    }

    pub fn apply(self, am: &mut ActiveModel) {
        if let Some(v) = self.title { am.title = Set(v); }
        if let Some(v) = self.body { am.body = Set(v); }
        if let Some(v) = self.category { am.category = Set(v); }
        if let Some(v) = self.author { am.author = Set(v); }
        if let Some(v) = self.pinned { am.pinned = Set(v); }
        if let Some(v) = self.attachment_url { am.attachment_url = Set(v); }
        if let Some(v) = self.expires_at { am.expires_at = Set(v); }
        am.updated_at = Set(Utc::now().into());
    }
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::Pinned)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: NoticeFields) -> Result<Model, ModelError> {
    let am: ActiveModel = fields.into_new_model().into();
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: NoticeFields) -> Result<Model, ModelError> {
    let mut am: ActiveModel = existing.into();
    fields.apply(&mut am);
    Ok(am.update(db).await?)
}

/// Returns whether a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{INVALID_URL, REQUIRED};
    use chrono::{Duration, FixedOffset};
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        v.as_object().cloned().unwrap_or_default()
    }

    fn at(title: &str, pinned: bool, offset_secs: i64) -> Model {
        let base: chrono::DateTime<FixedOffset> = Utc::now().into();
        let mut m = NoticeFields { title: Some(title.into()), body: Some("b".into()), pinned: Some(pinned), ..Default::default() }
            .into_new_model();
        m.created_at = base + Duration::seconds(offset_secs);
        m
    }

    #[test]
    fn pinned_first_then_newest() {
        let mut v = vec![at("A", false, 1), at("B", true, 0), at("C", false, 2)];
        v.sort_by(listing_order);
        let titles: Vec<_> = v.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["B", "C", "A"]);
    }

    #[test]
    fn defaults_apply_on_create() {
        let f = NoticeFields::from_payload(&payload(json!({"title": "Water", "body": "Off at 5"})), Mode::Create).unwrap();
        let m = f.into_new_model();
        assert_eq!(m.category, DEFAULT_CATEGORY);
        assert_eq!(m.author, DEFAULT_AUTHOR);
        assert!(!m.pinned);
        assert_eq!(m.attachment_url, None);
    }

    #[test]
    fn create_requires_title_and_body_patch_does_not() {
        let errs = NoticeFields::from_payload(&Payload::new(), Mode::Create).unwrap_err();
        assert_eq!(errs.get("title"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errs.get("body"), Some(&[REQUIRED.to_string()][..]));
        assert!(NoticeFields::from_payload(&payload(json!({"pinned": true})), Mode::Partial).is_ok());
    }

    #[test]
    fn rejects_bad_category_and_url() {
        let errs = NoticeFields::from_payload(
            &payload(json!({"category": "Party", "attachment_url": "file:///etc/passwd"})),
            Mode::Partial,
        )
        .unwrap_err();
        assert!(errs.contains("category"));
        assert_eq!(errs.get("attachment_url"), Some(&[INVALID_URL.to_string()][..]));
    }

    #[test]
    fn patch_can_clear_attachment() {
        let mut m = NoticeFields {
            title: Some("t".into()),
            body: Some("b".into()),
            attachment_url: Some(Some("https://x.org/a.pdf".into())),
            ..Default::default()
        }
        .into_new_model();
        NoticeFields::from_payload(&payload(json!({"attachment_url": null})), Mode::Partial)
            .unwrap()
            .apply_to_model(&mut m);
        assert_eq!(m.attachment_url, None);
        assert_eq!(m.title, "t");
    }
}
