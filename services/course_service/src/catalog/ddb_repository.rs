//! DynamoDB implementation of the catalog repository.
//!
//! Courses, modules and videos live in three tables keyed by their own id;
//! modules and videos carry a `CourseIdIndex` GSI (videos additionally a
//! `ModuleIdIndex`) so cascades and hierarchy reads are queries, not scans.

use std::collections::HashMap;

use common_macros::hash_map;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    AttributeValue, ConditionCheck, Delete, DeleteItemError, DeleteItemInput, DynamoDb, GetItemInput, Put,
    PutItemError, PutItemInput, QueryInput, ScanInput, TransactWriteItem, TransactWriteItemsError,
    TransactWriteItemsInput, UpdateItemError, UpdateItemInput,
};
use serde::Serialize;
use uuid::Uuid;

use super::repository::{CatalogRepository, DeleteError, GetError, PutError, UpdateError};
use super::types::{Course, CourseUpdate, Module, ModuleUpdate, Video, VideoUpdate};

/// Write transactions accept at most 25 items; larger cascades run in chunks.
const TRANSACT_CHUNK: usize = 25;

#[derive(Clone, Debug)]
pub struct CatalogTables {
    pub courses: String,
    pub modules: String,
    pub videos: String,
}

pub struct DdbCatalogRepository<D: DynamoDb + Send + Sync> {
    ddb: D,
    tables: CatalogTables,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CourseIdKey {
    course_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ModuleIdKey {
    module_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct VideoIdKey {
    video_id: String,
}

fn string_attr(value: impl Into<String>) -> AttributeValue {
    AttributeValue {
        s: Some(value.into()),
        ..AttributeValue::default()
    }
}

impl<D: DynamoDb + Send + Sync> DdbCatalogRepository<D> {
    pub fn new(ddb: D, tables: CatalogTables) -> Self {
        Self { ddb, tables }
    }

    fn course_key(course_id: &Uuid) -> HashMap<String, AttributeValue> {
        serde_dynamodb::to_hashmap(&CourseIdKey { course_id: *course_id }).unwrap()
    }

    fn module_key(module_id: &Uuid) -> HashMap<String, AttributeValue> {
        serde_dynamodb::to_hashmap(&ModuleIdKey { module_id: *module_id }).unwrap()
    }

    fn video_key(video_id: &str) -> HashMap<String, AttributeValue> {
        serde_dynamodb::to_hashmap(&VideoIdKey {
            video_id: video_id.to_owned(),
        })
        .unwrap()
    }

    /// Runs a `CourseIdIndex`/`ModuleIdIndex` query to completion and
    /// deserializes every item.
    async fn query_index<T: serde::de::DeserializeOwned>(
        &self,
        table_name: &str,
        index_name: &str,
        key_field: &str,
        key_value: AttributeValue,
    ) -> Result<Vec<T>, GetError> {
        let mut records = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let output = self
                .ddb
                .query(QueryInput {
                    table_name: table_name.to_owned(),
                    index_name: Some(index_name.to_owned()),
                    key_condition_expression: Some(format!("{} = :key", key_field)),
                    expression_attribute_values: Some(hash_map! {
                        ":key".to_owned() => key_value.clone(),
                    }),
                    exclusive_start_key,
                    ..QueryInput::default()
                })
                .await
                .map_err(|e| GetError::Other(e.into()))?;

            for item in output.items.unwrap_or_default() {
                let record = serde_dynamodb::from_hashmap(item).map_err(|e| GetError::Other(e.into()))?;
                records.push(record);
            }

            exclusive_start_key = output.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(records)
    }

    async fn videos_of_course(&self, course_id: &Uuid) -> Result<Vec<Video>, GetError> {
        self.query_index(
            &self.tables.videos,
            "CourseIdIndex",
            "CourseId",
            string_attr(course_id.to_string()),
        )
        .await
    }

    /// Deletes a batch of child records all-or-nothing. Used by cascades; the
    /// parent record is only removed after every chunk has gone through.
    async fn delete_children(&self, mut items: Vec<TransactWriteItem>) -> Result<(), DeleteError> {
        while !items.is_empty() {
            let chunk: Vec<_> = items.drain(..items.len().min(TRANSACT_CHUNK)).collect();
            self.ddb
                .transact_write_items(TransactWriteItemsInput {
                    transact_items: chunk,
                    ..TransactWriteItemsInput::default()
                })
                .await
                .map_err(|e| {
                    log::error!("Cascade transaction failed; parent record kept. Original error: {:?}.", e);
                    DeleteError::CascadeInterrupted
                })?;
        }

        Ok(())
    }

    fn delete_request(table_name: &str, key: HashMap<String, AttributeValue>) -> TransactWriteItem {
        TransactWriteItem {
            delete: Some(Delete {
                table_name: table_name.to_owned(),
                key,
                ..Delete::default()
            }),
            ..TransactWriteItem::default()
        }
    }

    /// Condition-check item asserting the parent record still exists at
    /// write time. Paired with `guarded_insert` in one transaction so a
    /// child insert racing a cascade loses instead of landing orphaned.
    fn exists_check(table_name: &str, key: HashMap<String, AttributeValue>, id_field: &str) -> TransactWriteItem {
        TransactWriteItem {
            condition_check: Some(ConditionCheck {
                table_name: table_name.to_owned(),
                key,
                condition_expression: format!("attribute_exists({})", id_field),
                ..ConditionCheck::default()
            }),
            ..TransactWriteItem::default()
        }
    }

    fn guarded_insert(table_name: &str, item: HashMap<String, AttributeValue>, id_field: &str) -> TransactWriteItem {
        TransactWriteItem {
            put: Some(Put {
                table_name: table_name.to_owned(),
                item,
                condition_expression: Some(format!("attribute_not_exists({})", id_field)),
                ..Put::default()
            }),
            ..TransactWriteItem::default()
        }
    }
}

#[async_trait::async_trait]
impl<D: DynamoDb + Send + Sync> CatalogRepository for DdbCatalogRepository<D> {
    async fn create_course(&self, course: &Course) -> Result<(), PutError> {
        self.ddb
            .put_item(PutItemInput {
                table_name: self.tables.courses.clone(),
                item: serde_dynamodb::to_hashmap(course).unwrap(),
                condition_expression: Some("attribute_not_exists(CourseId)".to_owned()),
                ..PutItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(PutItemError::ConditionalCheckFailed(_)) => PutError::Duplicate,
                e => {
                    log::error!("Failed to write course. Original error: {:?}.", e);
                    PutError::Other(e.into())
                }
            })?;

        Ok(())
    }

    async fn get_course(&self, course_id: &Uuid) -> Result<Course, GetError> {
        let output = self
            .ddb
            .get_item(GetItemInput {
                table_name: self.tables.courses.clone(),
                key: Self::course_key(course_id),
                ..GetItemInput::default()
            })
            .await
            .map_err(|e| GetError::Other(e.into()))?;

        match output.item {
            None => Err(GetError::NotFound),
            Some(item) => serde_dynamodb::from_hashmap(item).map_err(|e| GetError::Other(e.into())),
        }
    }

    async fn list_courses(&self) -> Result<Vec<Course>, GetError> {
        let mut courses: Vec<Course> = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let output = self
                .ddb
                .scan(ScanInput {
                    table_name: self.tables.courses.clone(),
                    exclusive_start_key,
                    ..ScanInput::default()
                })
                .await
                .map_err(|e| GetError::Other(e.into()))?;

            for item in output.items.unwrap_or_default() {
                let course = serde_dynamodb::from_hashmap(item).map_err(|e| GetError::Other(e.into()))?;
                courses.push(course);
            }

            exclusive_start_key = output.last_evaluated_key;
            if exclusive_start_key.is_none() {
                break;
            }
        }

        courses.sort_by_key(|c: &Course| c.created_at);
        Ok(courses)
    }

    async fn update_course(&self, course_id: &Uuid, update: &CourseUpdate) -> Result<Course, UpdateError> {
        // Read-merge-write; the existence condition on the write prevents
        // resurrecting a record deleted in between.
        let mut course = self.get_course(course_id).await.map_err(|e| match e {
            GetError::NotFound => UpdateError::NotFound,
            GetError::Other(e) => UpdateError::Other(e),
        })?;
        course.apply(update);

        self.ddb
            .put_item(PutItemInput {
                table_name: self.tables.courses.clone(),
                item: serde_dynamodb::to_hashmap(&course).unwrap(),
                condition_expression: Some("attribute_exists(CourseId)".to_owned()),
                ..PutItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(PutItemError::ConditionalCheckFailed(_)) => UpdateError::NotFound,
                e => {
                    log::error!("Failed to update course. Original error: {:?}.", e);
                    UpdateError::Other(e.into())
                }
            })?;

        Ok(course)
    }

    async fn delete_course(&self, course_id: &Uuid) -> Result<(), DeleteError> {
        self.get_course(course_id).await.map_err(|e| match e {
            GetError::NotFound => DeleteError::NotFound,
            GetError::Other(e) => DeleteError::Other(e),
        })?;

        let videos = self.videos_of_course(course_id).await.map_err(|e| match e {
            GetError::NotFound => DeleteError::NotFound,
            GetError::Other(e) => DeleteError::Other(e),
        })?;
        let modules = self.modules_of_course(course_id).await.map_err(|e| match e {
            GetError::NotFound => DeleteError::NotFound,
            GetError::Other(e) => DeleteError::Other(e),
        })?;

        let mut deletes: Vec<TransactWriteItem> = videos
            .iter()
            .map(|v| Self::delete_request(&self.tables.videos, Self::video_key(&v.video_id)))
            .collect();
        deletes.extend(
            modules
                .iter()
                .map(|m| Self::delete_request(&self.tables.modules, Self::module_key(&m.module_id))),
        );
        self.delete_children(deletes).await?;

        self.ddb
            .delete_item(DeleteItemInput {
                table_name: self.tables.courses.clone(),
                key: Self::course_key(course_id),
                condition_expression: Some("attribute_exists(CourseId)".to_owned()),
                ..DeleteItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(DeleteItemError::ConditionalCheckFailed(_)) => DeleteError::NotFound,
                e => {
                    log::error!("Failed to delete course after cascade. Original error: {:?}.", e);
                    DeleteError::Other(e.into())
                }
            })?;

        Ok(())
    }

    async fn increment_student_count(&self, course_id: &Uuid) -> Result<(), UpdateError> {
        self.ddb
            .update_item(UpdateItemInput {
                table_name: self.tables.courses.clone(),
                key: Self::course_key(course_id),
                update_expression: Some("ADD StudentCount :one".to_owned()),
                condition_expression: Some("attribute_exists(CourseId)".to_owned()),
                expression_attribute_values: Some(hash_map! {
                    ":one".to_owned() => AttributeValue {
                        n: Some("1".to_owned()),
                        ..AttributeValue::default()
                    },
                }),
                ..UpdateItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(UpdateItemError::ConditionalCheckFailed(_)) => UpdateError::NotFound,
                e => {
                    log::error!("Failed to bump student counter. Original error: {:?}.", e);
                    UpdateError::Other(e.into())
                }
            })?;

        Ok(())
    }

    async fn add_module(&self, mut module: Module) -> Result<Module, PutError> {
        self.get_course(&module.course_id).await.map_err(|e| match e {
            GetError::NotFound => PutError::ParentNotFound,
            GetError::Other(e) => PutError::Other(e),
        })?;

        let siblings = self.modules_of_course(&module.course_id).await.map_err(|e| match e {
            GetError::NotFound => PutError::ParentNotFound,
            GetError::Other(e) => PutError::Other(e),
        })?;
        module.position = siblings.len() as i32;

        // The insert and the parent existence check execute as one
        // transaction, so a racing course cascade cannot strand the module.
        let result = self
            .ddb
            .transact_write_items(TransactWriteItemsInput {
                transact_items: vec![
                    Self::exists_check(&self.tables.courses, Self::course_key(&module.course_id), "CourseId"),
                    Self::guarded_insert(
                        &self.tables.modules,
                        serde_dynamodb::to_hashmap(&module).unwrap(),
                        "ModuleId",
                    ),
                ],
                ..TransactWriteItemsInput::default()
            })
            .await;

        if let Err(e) = result {
            return Err(match e {
                RusotoError::Service(TransactWriteItemsError::TransactionCanceled(_)) => {
                    // The course vanished or the module id is taken; one read
                    // tells which.
                    match self.get_course(&module.course_id).await {
                        Ok(_) => PutError::Duplicate,
                        Err(GetError::NotFound) => PutError::ParentNotFound,
                        Err(GetError::Other(e)) => PutError::Other(e),
                    }
                }
                e => {
                    log::error!("Failed to write module. Original error: {:?}.", e);
                    PutError::Other(e.into())
                }
            });
        }

        Ok(module)
    }

    async fn get_module(&self, module_id: &Uuid) -> Result<Module, GetError> {
        let output = self
            .ddb
            .get_item(GetItemInput {
                table_name: self.tables.modules.clone(),
                key: Self::module_key(module_id),
                ..GetItemInput::default()
            })
            .await
            .map_err(|e| GetError::Other(e.into()))?;

        match output.item {
            None => Err(GetError::NotFound),
            Some(item) => serde_dynamodb::from_hashmap(item).map_err(|e| GetError::Other(e.into())),
        }
    }

    async fn modules_of_course(&self, course_id: &Uuid) -> Result<Vec<Module>, GetError> {
        let mut modules: Vec<Module> = self
            .query_index(
                &self.tables.modules,
                "CourseIdIndex",
                "CourseId",
                string_attr(course_id.to_string()),
            )
            .await?;
        modules.sort_by_key(|m| m.position);
        Ok(modules)
    }

    async fn update_module(&self, module_id: &Uuid, update: &ModuleUpdate) -> Result<Module, UpdateError> {
        let mut module = self.get_module(module_id).await.map_err(|e| match e {
            GetError::NotFound => UpdateError::NotFound,
            GetError::Other(e) => UpdateError::Other(e),
        })?;
        module.apply(update);

        self.ddb
            .put_item(PutItemInput {
                table_name: self.tables.modules.clone(),
                item: serde_dynamodb::to_hashmap(&module).unwrap(),
                condition_expression: Some("attribute_exists(ModuleId)".to_owned()),
                ..PutItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(PutItemError::ConditionalCheckFailed(_)) => UpdateError::NotFound,
                e => {
                    log::error!("Failed to update module. Original error: {:?}.", e);
                    UpdateError::Other(e.into())
                }
            })?;

        Ok(module)
    }

    async fn delete_module(&self, module_id: &Uuid) -> Result<(), DeleteError> {
        self.get_module(module_id).await.map_err(|e| match e {
            GetError::NotFound => DeleteError::NotFound,
            GetError::Other(e) => DeleteError::Other(e),
        })?;

        let videos = self.videos_of_module(module_id).await.map_err(|e| match e {
            GetError::NotFound => DeleteError::NotFound,
            GetError::Other(e) => DeleteError::Other(e),
        })?;
        let deletes = videos
            .iter()
            .map(|v| Self::delete_request(&self.tables.videos, Self::video_key(&v.video_id)))
            .collect();
        self.delete_children(deletes).await?;

        self.ddb
            .delete_item(DeleteItemInput {
                table_name: self.tables.modules.clone(),
                key: Self::module_key(module_id),
                condition_expression: Some("attribute_exists(ModuleId)".to_owned()),
                ..DeleteItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(DeleteItemError::ConditionalCheckFailed(_)) => DeleteError::NotFound,
                e => {
                    log::error!("Failed to delete module after cascade. Original error: {:?}.", e);
                    DeleteError::Other(e.into())
                }
            })?;

        Ok(())
    }

    async fn add_video(&self, mut video: Video) -> Result<Video, PutError> {
        let module = self.get_module(&video.module_id).await.map_err(|e| match e {
            GetError::NotFound => PutError::ParentNotFound,
            GetError::Other(e) => PutError::Other(e),
        })?;
        video.course_id = module.course_id;

        let siblings = self.videos_of_module(&video.module_id).await.map_err(|e| match e {
            GetError::NotFound => PutError::ParentNotFound,
            GetError::Other(e) => PutError::Other(e),
        })?;
        video.position = siblings.len() as i32;

        // Cascades delete children before parents, so conditioning on the
        // module covers the course as well.
        let result = self
            .ddb
            .transact_write_items(TransactWriteItemsInput {
                transact_items: vec![
                    Self::exists_check(&self.tables.modules, Self::module_key(&video.module_id), "ModuleId"),
                    Self::guarded_insert(&self.tables.videos, serde_dynamodb::to_hashmap(&video).unwrap(), "VideoId"),
                ],
                ..TransactWriteItemsInput::default()
            })
            .await;

        if let Err(e) = result {
            return Err(match e {
                RusotoError::Service(TransactWriteItemsError::TransactionCanceled(_)) => {
                    match self.get_module(&video.module_id).await {
                        Ok(_) => PutError::Duplicate,
                        Err(GetError::NotFound) => PutError::ParentNotFound,
                        Err(GetError::Other(e)) => PutError::Other(e),
                    }
                }
                e => {
                    log::error!("Failed to write video. Original error: {:?}.", e);
                    PutError::Other(e.into())
                }
            });
        }

        Ok(video)
    }

    async fn get_video(&self, video_id: &str) -> Result<Video, GetError> {
        let output = self
            .ddb
            .get_item(GetItemInput {
                table_name: self.tables.videos.clone(),
                key: Self::video_key(video_id),
                ..GetItemInput::default()
            })
            .await
            .map_err(|e| GetError::Other(e.into()))?;

        match output.item {
            None => Err(GetError::NotFound),
            Some(item) => serde_dynamodb::from_hashmap(item).map_err(|e| GetError::Other(e.into())),
        }
    }

    async fn videos_of_module(&self, module_id: &Uuid) -> Result<Vec<Video>, GetError> {
        let mut videos: Vec<Video> = self
            .query_index(
                &self.tables.videos,
                "ModuleIdIndex",
                "ModuleId",
                string_attr(module_id.to_string()),
            )
            .await?;
        videos.sort_by_key(|v| v.position);
        Ok(videos)
    }

    async fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<Video, UpdateError> {
        let mut video = self.get_video(video_id).await.map_err(|e| match e {
            GetError::NotFound => UpdateError::NotFound,
            GetError::Other(e) => UpdateError::Other(e),
        })?;
        video.apply(update);

        self.ddb
            .put_item(PutItemInput {
                table_name: self.tables.videos.clone(),
                item: serde_dynamodb::to_hashmap(&video).unwrap(),
                condition_expression: Some("attribute_exists(VideoId)".to_owned()),
                ..PutItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(PutItemError::ConditionalCheckFailed(_)) => UpdateError::NotFound,
                e => {
                    log::error!("Failed to update video. Original error: {:?}.", e);
                    UpdateError::Other(e.into())
                }
            })?;

        Ok(video)
    }

    async fn delete_video(&self, video_id: &str) -> Result<(), DeleteError> {
        self.ddb
            .delete_item(DeleteItemInput {
                table_name: self.tables.videos.clone(),
                key: Self::video_key(video_id),
                condition_expression: Some("attribute_exists(VideoId)".to_owned()),
                ..DeleteItemInput::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(DeleteItemError::ConditionalCheckFailed(_)) => DeleteError::NotFound,
                e => {
                    log::error!("Failed to delete video. Original error: {:?}.", e);
                    DeleteError::Other(e.into())
                }
            })?;

        Ok(())
    }
}
