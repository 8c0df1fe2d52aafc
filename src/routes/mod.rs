pub mod auth;
pub mod books;
pub mod vendeurs;
pub mod achats;
pub mod referentiels;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::auth_routes)
            .configure(books::book_routes)
            .configure(vendeurs::vendeur_routes)
            .configure(achats::achat_routes)
            .configure(referentiels::referentiel_routes)
    );
}
