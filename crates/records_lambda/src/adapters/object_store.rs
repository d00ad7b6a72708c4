use super::StoreError;

pub trait ObjectStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), StoreError>;
}
