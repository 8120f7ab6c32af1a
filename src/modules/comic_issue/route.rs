use crate::modules::comic_issue::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/comic-issue")
            .service(create)
            .service(find_all)
            .service(find_one)
            .service(update)
            .service(update_file)
            .service(publish)
            .service(unpublish)
            .service(pseudo_delete)
            .service(pseudo_recover)
            .service(remove)
            .service(add_page),
    );
}
