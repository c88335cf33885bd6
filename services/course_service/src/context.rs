use core::fmt;
use std::env;
use std::sync::Arc;

use rusoto_core::Region;
use rusoto_dynamodb::DynamoDbClient;

use crate::catalog::{CatalogTables, DdbCatalogRepository};
use crate::enrollment::{DdbEnrollmentsRepository, EnrollmentsTable};
use crate::notification::{HttpNotificationDispatcher, NotificationDispatcher, UnconfiguredDispatcher};

pub(crate) enum ContextKey {
    DynamoDbEndpoint,
    CoursesTableName,
    ModulesTableName,
    VideosTableName,
    EnrollmentsTableName,
    NotificationEndpoint,
}

pub struct Context {
    pub catalog: DdbCatalogRepository<DynamoDbClient>,
    pub enrollments: DdbEnrollmentsRepository<DynamoDbClient>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DynamoDbEndpoint => write!(f, "DYNAMODB_ENDPOINT"),
            Self::CoursesTableName => write!(f, "COURSES_TABLE_NAME"),
            Self::ModulesTableName => write!(f, "MODULES_TABLE_NAME"),
            Self::VideosTableName => write!(f, "VIDEOS_TABLE_NAME"),
            Self::EnrollmentsTableName => write!(f, "ENROLLMENTS_TABLE_NAME"),
            Self::NotificationEndpoint => write!(f, "NOTIFICATION_ENDPOINT"),
        }
    }
}

impl Context {
    pub fn from_env() -> Self {
        let region = if let Some(endpoint) = Context::key(&ContextKey::DynamoDbEndpoint) {
            log::info!("Using DynamoDB with endpoint: {}.", endpoint);
            Region::Custom {
                name: "custom".to_string(),
                endpoint,
            }
        } else {
            let default_region = Region::default();
            log::info!("Using DynamoDB in region: {}.", default_region.name());
            default_region
        };

        let tables = CatalogTables {
            courses: Context::required_key(&ContextKey::CoursesTableName),
            modules: Context::required_key(&ContextKey::ModulesTableName),
            videos: Context::required_key(&ContextKey::VideosTableName),
        };
        let enrollments_table = EnrollmentsTable {
            name: Context::required_key(&ContextKey::EnrollmentsTableName),
        };

        let dispatcher: Arc<dyn NotificationDispatcher> =
            if let Some(endpoint) = Context::key(&ContextKey::NotificationEndpoint) {
                log::info!("Dispatching decision notifications to: {}.", endpoint);
                Arc::new(HttpNotificationDispatcher::new(endpoint))
            } else {
                log::warn!("No notification endpoint configured; decisions will not be delivered.");
                Arc::new(UnconfiguredDispatcher)
            };

        Context {
            catalog: DdbCatalogRepository::new(DynamoDbClient::new(region.clone()), tables),
            enrollments: DdbEnrollmentsRepository::new(DynamoDbClient::new(region), enrollments_table),
            dispatcher,
        }
    }

    pub fn key(key: &ContextKey) -> Option<String> {
        env::var(key.to_string()).ok()
    }

    fn required_key(key: &ContextKey) -> String {
        Context::key(key).unwrap_or_else(|| panic!("Missing required environment variable: {}.", key))
    }
}
