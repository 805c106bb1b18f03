/// SQLite-backed guide store.
///
/// Filter clauses and their bound values go through `sqlx::QueryBuilder::push_bind`
/// together, and the same `push_filter` feeds both the COUNT and the page query.
/// Search uses `instr` over `lower()`d columns, so it ignores ASCII case and
/// `%`/`_` match literally.
use site_common::error::CommonError;
use site_common::sqlite::{encode_tags, Database};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::info;

use crate::filter::QueryFilter;
use crate::model::{Guide, GuideRow, Tip};
use crate::seed;
use crate::store::SeedOutcome;

const SELECT_GUIDES: &str = "SELECT id, slug, title, description, content, difficulty, category, \
     tags, created_at, updated_at FROM guides";

const SELECT_GUIDE_BY_SLUG: &str = "SELECT id, slug, title, description, content, difficulty, \
     category, tags, created_at, updated_at FROM guides WHERE slug = ?";

const INSERT_GUIDE: &str = "INSERT OR IGNORE INTO guides \
     (slug, title, description, content, difficulty, category, tags, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const INSERT_TIP: &str =
    "INSERT INTO tips (title, content, category, difficulty) VALUES (?, ?, ?, ?)";

pub struct SqliteGuideStore {
    db: Database,
}

impl SqliteGuideStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn is_available(&self) -> bool {
        self.db.is_available().await
    }

    pub async fn count(&self, filter: &QueryFilter) -> Result<u64, CommonError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM guides");
        push_filter(&mut query, filter);
        let total: i64 = query
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;
        Ok(total.max(0) as u64)
    }

    pub async fn fetch_page(&self, filter: &QueryFilter) -> Result<Vec<Guide>, CommonError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_GUIDES);
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(filter.offset).unwrap_or(i64::MAX));

        let rows: Vec<GuideRow> = query
            .build_query_as()
            .fetch_all(self.db.pool())
            .await?;
        rows.into_iter().map(Guide::try_from).collect()
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Guide>, CommonError> {
        let row: Option<GuideRow> = sqlx::query_as(SELECT_GUIDE_BY_SLUG)
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;
        row.map(Guide::try_from).transpose()
    }

    /// Create the tables, then seed guides and tips in one transaction when
    /// `guides` is empty. Running it again is a no-op.
    pub async fn initialize(&self) -> Result<SeedOutcome, CommonError> {
        self.db.ensure_schema().await?;

        let mut tx = self.db.pool().begin().await?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guides")
            .fetch_one(&mut *tx)
            .await?;

        let seeded = if existing == 0 {
            let guides = seed::sample_guides();
            seed::validate_guides(&guides)?;
            for guide in &guides {
                insert_guide(&mut tx, guide).await?;
            }

            let tips: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tips")
                .fetch_one(&mut *tx)
                .await?;
            if tips == 0 {
                for tip in seed::sample_tips() {
                    insert_tip(&mut tx, &tip).await?;
                }
            }
            true
        } else {
            false
        };

        let guide_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guides")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        if seeded {
            info!(guide_count, "sqlite store seeded with sample data");
        }
        Ok(SeedOutcome {
            seeded,
            guide_count: guide_count.max(0) as u64,
        })
    }

    /// Insert guides as-is (ids are assigned by SQLite). Slugs already present are skipped.
    #[cfg(test)]
    pub async fn insert_guides(&self, guides: &[Guide]) -> Result<u64, CommonError> {
        let mut tx = self.db.pool().begin().await?;
        let mut inserted = 0;
        for guide in guides {
            inserted += insert_guide(&mut tx, guide).await?;
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

/// Append the `WHERE` clause for `filter`, binding each value next to its placeholder.
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &QueryFilter) {
    query.push(" WHERE 1=1");

    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }

    if let Some(difficulty) = filter.difficulty {
        query.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }

    if let Some(term) = &filter.search {
        query
            .push(" AND (instr(lower(title), lower(")
            .push_bind(term.clone())
            .push(")) > 0 OR instr(lower(description), lower(")
            .push_bind(term.clone())
            .push(")) > 0 OR instr(lower(content), lower(")
            .push_bind(term.clone())
            .push(")) > 0)");
    }
}

async fn insert_guide(conn: &mut SqliteConnection, guide: &Guide) -> Result<u64, CommonError> {
    let result = sqlx::query(INSERT_GUIDE)
        .bind(&guide.slug)
        .bind(&guide.title)
        .bind(&guide.description)
        .bind(&guide.content)
        .bind(guide.difficulty.as_str())
        .bind(&guide.category)
        .bind(encode_tags(&guide.tags))
        .bind(guide.created_at)
        .bind(guide.updated_at)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

async fn insert_tip(conn: &mut SqliteConnection, tip: &Tip) -> Result<(), CommonError> {
    sqlx::query(INSERT_TIP)
        .bind(&tip.title)
        .bind(&tip.content)
        .bind(&tip.category)
        .bind(tip.difficulty.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(())
}
