pub mod compile_time {
    pub mod file_processing {
        /// Maximum input report size (512MB)
        /// SECURITY: Prevents DoS attacks via oversized reports
        /// SSDF: PW.7.1 (Input Validation), PW.8.1 (DoS Protection)
        pub const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

        /// Threshold for considering a report "large" (16MB)
        /// PERFORMANCE: Large reports get a progress hint in the logs
        pub const LARGE_FILE_THRESHOLD: u64 = 16 * 1024 * 1024;

        /// Buffer capacity for the input reader
        pub const READ_BUFFER_SIZE: usize = 64 * 1024;
    }

    pub mod stream {
        /// Maximum element nesting depth accepted from the tokenizer
        /// SECURITY: Prevents resource exhaustion via pathological nesting
        /// SSDF: PW.8.1 (DoS Protection)
        pub const MAX_ELEMENT_DEPTH: usize = 256;

        /// Initial capacity of the event read buffer
        pub const EVENT_BUFFER_CAPACITY: usize = 4096;
    }

    pub mod interpreter {
        /// Maximum number of rule definitions plus rule results per document
        /// SECURITY: Bounds the in-memory document before serialization
        /// SSDF: PW.8.1 (DoS Protection)
        pub const MAX_RECORDS_PER_DOCUMENT: usize = 1_000_000;

        /// Maximum number of selections kept for one profile
        pub const MAX_SELECTIONS_PER_PROFILE: usize = 100_000;

        /// Maximum text captured for a single field (16MB)
        /// SECURITY: A runaway description cannot exhaust memory
        pub const MAX_FIELD_TEXT_LENGTH: usize = 16 * 1024 * 1024;
    }

    pub mod logging {
        /// Log buffer size for the in-memory logger
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
