use crate::modules::creator::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/creator")
            .service(find_all)
            .service(find_one)
            .service(update)
            .service(update_file),
    );
}
