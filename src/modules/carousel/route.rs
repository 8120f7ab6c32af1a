use crate::modules::carousel::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/carousel")
            .service(create)
            .service(find_all)
            .service(find_one)
            .service(update)
            .service(update_image)
            .service(expire),
    );
}
