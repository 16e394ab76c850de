use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_indexes")
        .depends_on(&["0001_initial_schema"])
        .operation(AddIndex::new(
            "works",
            Index::new("idx_works_frbr_uri").column("frbr_uri"),
        ))
        .operation(AddIndex::new(
            "works",
            Index::new("idx_works_slug").column("slug"),
        ))
        .operation(AddIndex::new(
            "document_nodes",
            Index::new("idx_document_nodes_work").column("work_id"),
        ))
        .operation(AddIndex::new(
            "document_nodes",
            Index::new("idx_document_nodes_parent").column("parent_id"),
        ))
        .operation(AddIndex::new(
            "document_nodes",
            Index::new("idx_document_nodes_sort")
                .column("work_id")
                .column_desc("sort_order"),
        ))
        .operation(AddIndex::new(
            "legal_chunks",
            Index::new("idx_legal_chunks_work").column("work_id"),
        ))
        .operation(AddIndex::new(
            "legal_chunks",
            Index::new("idx_legal_chunks_node").column("node_id"),
        ))
        .operation(AddIndex::new(
            "crawl_jobs",
            Index::new("idx_crawl_jobs_status").column("status"),
        ))
        .operation(AddIndex::new(
            "crawl_jobs",
            Index::new("idx_crawl_jobs_crawling_stale")
                .column("last_crawled_at")
                .filter("status = 'crawling'"),
        ))
        .operation(AddIndex::new(
            "crawl_jobs",
            Index::new("idx_crawl_jobs_reprocess")
                .column("status")
                .column("extraction_version")
                .filter("status IN ('loaded', 'parsed', 'downloaded')"),
        ))
        .operation(AddIndex::new(
            "crawl_jobs",
            Index::new("idx_crawl_jobs_run").column("run_id"),
        ))
        .operation(AddIndex::new(
            "work_relationships",
            Index::new("idx_work_relationships_source").column("source_work_id"),
        ))
        .operation(AddIndex::new(
            "work_relationships",
            Index::new("idx_work_relationships_target").column("target_work_id"),
        ))
}
