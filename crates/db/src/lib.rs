pub mod repositories;
pub mod schema;

pub mod mock;

use std::path::Path;

use eyre::Result;

pub use repositories::config::JsonConfigStore;
pub use repositories::events::JsonEventStore;
pub use schema::DataLayout;

/// Open the JSON stores rooted at `data_dir`, creating the layout when missing.
pub async fn open_stores(data_dir: impl AsRef<Path>) -> Result<(JsonConfigStore, JsonEventStore)> {
    let layout = DataLayout::new(data_dir.as_ref());
    schema::initialize_data_dir(&layout).await?;

    Ok((
        JsonConfigStore::new(layout.clone()),
        JsonEventStore::new(layout),
    ))
}
