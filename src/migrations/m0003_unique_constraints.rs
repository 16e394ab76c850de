use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0003_unique_constraints")
        .depends_on(&["0001_initial_schema"])
        .operation(RunSql::new(
            "CREATE UNIQUE INDEX idx_crawl_jobs_source_url ON crawl_jobs(source_id, url)",
        ))
        .operation(RunSql::new(
            "CREATE UNIQUE INDEX idx_works_frbr_uri_unique ON works(frbr_uri)",
        ))
        .operation(RunSql::new(
            "CREATE UNIQUE INDEX idx_document_nodes_path_unique ON document_nodes(work_id, path)",
        ))
        .operation(RunSql::new(
            "CREATE UNIQUE INDEX idx_work_relationships_unique ON work_relationships(source_work_id, target_work_id, relationship_type)",
        ))
}
