use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub async fn cat_file(&self, object_id: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id.to_string())?;
        let blob = self.client().blob(&oid).await?;

        write!(self.writer(), "{}", blob.content())?;

        Ok(())
    }
}
