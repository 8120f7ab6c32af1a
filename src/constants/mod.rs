pub struct Env {
    pub jwt_secret: String,
    pub database_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub presign_ttl_seconds: u64,
    pub max_upload_size: usize,
    pub compensate_partial_uploads: bool,
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let s3_bucket = std::env::var("S3_BUCKET")
            .expect("S3_BUCKET must be set in .env file or environment variable");
        let s3_region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let s3_endpoint = std::env::var("S3_ENDPOINT").ok().filter(|e| !e.is_empty());

        let presign_ttl_seconds = std::env::var("PRESIGN_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .expect("PRESIGN_TTL_SECONDS must be a valid u64 integer");
        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| "20971520".to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_SIZE must be a valid byte count");
        let compensate_partial_uploads = std::env::var("COMPENSATE_PARTIAL_UPLOADS")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .expect("COMPENSATE_PARTIAL_UPLOADS must be true or false");

        Env {
            jwt_secret,
            database_url,
            frontend_url,
            ip,
            port,
            s3_bucket,
            s3_region,
            s3_endpoint,
            presign_ttl_seconds,
            max_upload_size,
            compensate_partial_uploads,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
