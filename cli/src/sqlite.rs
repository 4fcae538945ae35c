use bytechomp::{record, types::*};

record! {
    /// The 100 byte header at the start of every SQLite database file. All
    /// multi-byte fields are big-endian.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SqliteHeader {
        pub header: [Bytes; 16],
        pub page_size: U16,
        pub file_format_write_version: U8,
        pub file_format_read_version: U8,
        pub reserved_space: U8,
        pub max_embedded_payload_fraction: U8,
        pub min_embedded_payload_fraction: U8,
        pub leaf_payload_fraction: U8,
        pub file_change_counter: U32,
        pub number_of_pages: U32,
        pub first_freelist_trunk_page: U32,
        pub total_freelist_pages: U32,
        pub schema_cookie: U32,
        pub schema_format_number: U32,
        pub default_page_cache_size: U32,
        pub page_of_largest_root_btree: U32,
        pub text_encoding: U32,
        pub user_version: U32,
        pub incremental_vacuum_mode: U32,
        pub application_id: U32,
        pub reserved: [U8; 20],
        pub version_valid_for: U32,
        pub sqlite_version: U32,
    }
}

pub const MAGIC: &[u8; 16] = b"SQLite format 3\0";
