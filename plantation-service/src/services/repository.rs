use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;

use crate::models::{Payment, PaymentStatus, Plucker, Record, Report, User};
use crate::services::MongoDb;

/// Builds the `$set` update for a repository mutation, stamping `updated_at`.
fn set_update(mut fields: Document) -> Document {
    fields.insert("updated_at", DateTime::now());
    doc! { "$set": fields }
}

#[derive(Clone)]
pub struct PluckerRepository {
    collection: Collection<Plucker>,
}

impl PluckerRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.pluckers(),
        }
    }

    pub async fn create(&self, plucker: &Plucker) -> Result<()> {
        self.collection.insert_one(plucker, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Plucker>> {
        let plucker = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(plucker)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Plucker>> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;
        let pluckers = cursor.try_collect().await?;
        Ok(pluckers)
    }

    pub async fn list(&self) -> Result<Vec<Plucker>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        let pluckers = cursor.try_collect().await?;
        Ok(pluckers)
    }

    /// Active pluckers ordered by running collection total, best first.
    pub async fn top_by_collection(&self, limit: i64) -> Result<Vec<Plucker>> {
        let options = FindOptions::builder()
            .sort(doc! { "collection": -1 })
            .limit(limit)
            .build();
        let cursor = self
            .collection
            .find(doc! { "status": "active" }, options)
            .await?;
        let pluckers = cursor.try_collect().await?;
        Ok(pluckers)
    }

    pub async fn update(&self, id: &str, fields: Document) -> Result<Option<Plucker>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let plucker = self
            .collection
            .find_one_and_update(doc! { "_id": id }, set_update(fields), options)
            .await?;
        Ok(plucker)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    /// Atomically add `delta` kilograms to the running collection total.
    pub async fn increment_collection(&self, id: &str, delta: f64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$inc": { "collection": delta },
                    "$set": { "updated_at": DateTime::now() }
                },
                None,
            )
            .await?;
        Ok(())
    }

    /// Overwrite the running collection total. Used by the record delete and
    /// update paths, which floor the rollback at zero after reading the
    /// current value; this read-then-write is not atomic with the record
    /// mutation that triggered it.
    pub async fn set_collection(&self, id: &str, value: f64) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                set_update(doc! { "collection": value }),
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn count_active(&self, created_before: Option<DateTime>) -> Result<u64> {
        let mut filter = doc! { "status": "active" };
        if let Some(before) = created_before {
            filter.insert("created_at", doc! { "$lt": before });
        }
        let count = self.collection.count_documents(filter, None).await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct RecordRepository {
    collection: Collection<Record>,
}

impl RecordRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.records(),
        }
    }

    pub async fn create(&self, record: &Record) -> Result<()> {
        self.collection.insert_one(record, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Record>> {
        let record = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(record)
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Record>> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    pub async fn list(&self) -> Result<Vec<Record>> {
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let cursor = self.collection.find(None, options).await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    pub async fn find_by_date_range(
        &self,
        start: DateTime,
        end: DateTime,
    ) -> Result<Vec<Record>> {
        let filter = doc! { "date": { "$gte": start, "$lte": end } };
        let cursor = self.collection.find(filter, None).await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    pub async fn update(&self, id: &str, fields: Document) -> Result<Option<Record>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let record = self
            .collection
            .find_one_and_update(doc! { "_id": id }, set_update(fields), options)
            .await?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Clone)]
pub struct PaymentRepository {
    collection: Collection<Payment>,
}

impl PaymentRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.payments(),
        }
    }

    pub async fn create(&self, payment: &Payment) -> Result<()> {
        self.collection.insert_one(payment, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let payment = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(payment)
    }

    pub async fn list(&self, filter: Document) -> Result<Vec<Payment>> {
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let cursor = self.collection.find(filter, options).await?;
        let payments = cursor.try_collect().await?;
        Ok(payments)
    }

    pub async fn find_by_plucker(&self, plucker_id: &str) -> Result<Vec<Payment>> {
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let cursor = self
            .collection
            .find(doc! { "details.plucker_id": plucker_id }, options)
            .await?;
        let payments = cursor.try_collect().await?;
        Ok(payments)
    }

    pub async fn find_by_date_range(
        &self,
        start: DateTime,
        end: DateTime,
    ) -> Result<Vec<Payment>> {
        let filter = doc! { "date": { "$gte": start, "$lte": end } };
        let cursor = self.collection.find(filter, None).await?;
        let payments = cursor.try_collect().await?;
        Ok(payments)
    }

    pub async fn update(&self, id: &str, fields: Document) -> Result<Option<Payment>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let payment = self
            .collection
            .find_one_and_update(doc! { "_id": id }, set_update(fields), options)
            .await?;
        Ok(payment)
    }

    pub async fn complete(&self, id: &str) -> Result<Option<Payment>> {
        let status = mongodb::bson::to_bson(&PaymentStatus::Completed)?;
        self.update(id, doc! { "status": status }).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.users(),
        }
    }

    pub async fn create(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "email": email }, None)
            .await?;
        Ok(user)
    }

    pub async fn update(&self, id: &str, fields: Document) -> Result<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let user = self
            .collection
            .find_one_and_update(doc! { "_id": id }, set_update(fields), options)
            .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct ReportRepository {
    collection: Collection<Report>,
}

impl ReportRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.reports(),
        }
    }

    pub async fn create(&self, report: &Report) -> Result<()> {
        self.collection.insert_one(report, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Report>> {
        let report = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(report)
    }

    pub async fn list(&self) -> Result<Vec<Report>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.collection.find(None, options).await?;
        let reports = cursor.try_collect().await?;
        Ok(reports)
    }

    pub async fn increment_downloads(&self, id: &str) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$inc": { "downloads": 1 },
                    "$set": { "updated_at": DateTime::now() }
                },
                None,
            )
            .await?;
        Ok(())
    }
}
