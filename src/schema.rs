// @generated. Matches the migrations under `migrations/`; kept in sync by hand
// since this crate has no `diesel print-schema` step in its build.

diesel::table! {
    regulation_types (code) {
        code -> Text,
        name -> Text,
    }
}

diesel::table! {
    works (id) {
        id -> Int4,
        frbr_uri -> Text,
        title -> Text,
        regulation_type -> Text,
        number -> Text,
        year -> Int4,
        status -> Text,
        source_page_url -> Nullable<Text>,
        pdf_url -> Nullable<Text>,
        slug -> Nullable<Text>,
        pdf_quality -> Nullable<Text>,
        parse_method -> Nullable<Text>,
        parse_confidence -> Nullable<Float8>,
        parse_warnings -> Nullable<Text>,
        pemrakarsa -> Nullable<Text>,
        tempat_penetapan -> Nullable<Text>,
        tanggal_penetapan -> Nullable<Text>,
        pejabat_penetap -> Nullable<Text>,
        nomor_pengundangan -> Nullable<Text>,
        nomor_tambahan -> Nullable<Text>,
        tanggal_pengundangan -> Nullable<Text>,
        pejabat_pengundangan -> Nullable<Text>,
        tentang -> Nullable<Text>,
        parsed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    document_nodes (id) {
        id -> Int4,
        work_id -> Int4,
        node_type -> Text,
        number -> Text,
        heading -> Nullable<Text>,
        content -> Text,
        parent_id -> Nullable<Int4>,
        path -> Text,
        depth -> Int4,
        sort_order -> Int4,
    }
}

diesel::table! {
    legal_chunks (id) {
        id -> Int4,
        work_id -> Int4,
        node_id -> Nullable<Int4>,
        content -> Text,
        metadata -> Text,
    }
}

diesel::table! {
    crawl_jobs (id) {
        id -> Int4,
        source_id -> Text,
        url -> Text,
        pdf_url -> Nullable<Text>,
        regulation_type -> Nullable<Text>,
        number -> Nullable<Text>,
        year -> Nullable<Int4>,
        frbr_uri -> Nullable<Text>,
        title -> Nullable<Text>,
        status -> Text,
        error_message -> Nullable<Text>,
        pdf_sha256 -> Nullable<Text>,
        pdf_size -> Nullable<Int4>,
        pdf_local_path -> Nullable<Text>,
        pdf_storage_url -> Nullable<Text>,
        work_id -> Nullable<Int4>,
        extraction_version -> Int4,
        run_id -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        last_crawled_at -> Nullable<Timestamptz>,
        pdf_downloaded_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    discovery_progress (source_id, regulation_type) {
        source_id -> Text,
        regulation_type -> Text,
        total_seen -> Int4,
        pages_crawled -> Int4,
        total_pages -> Int4,
        last_discovered_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    scraper_runs (id) {
        id -> Int4,
        source_id -> Text,
        jobs_discovered -> Int4,
        jobs_processed -> Int4,
        jobs_succeeded -> Int4,
        jobs_failed -> Int4,
        status -> Text,
        error_message -> Nullable<Text>,
        started_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    relationship_types (code) {
        code -> Text,
        inverse_code -> Nullable<Text>,
    }
}

diesel::table! {
    work_relationships (id) {
        id -> Int4,
        source_work_id -> Int4,
        target_work_id -> Int4,
        relationship_type -> Text,
    }
}

diesel::joinable!(works -> regulation_types (regulation_type));
diesel::joinable!(document_nodes -> works (work_id));
diesel::joinable!(legal_chunks -> works (work_id));
diesel::joinable!(legal_chunks -> document_nodes (node_id));
diesel::joinable!(crawl_jobs -> scraper_runs (run_id));
diesel::joinable!(crawl_jobs -> works (work_id));
diesel::joinable!(work_relationships -> relationship_types (relationship_type));

diesel::allow_tables_to_appear_in_same_query!(
    regulation_types,
    works,
    document_nodes,
    legal_chunks,
    crawl_jobs,
    discovery_progress,
    scraper_runs,
    relationship_types,
    work_relationships,
);
