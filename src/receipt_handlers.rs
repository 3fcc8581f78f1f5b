// src/receipt_handlers.rs
//! Receipt handlers: inbound goods from a vendor into a warehouse.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::{MessageResponse, OperationListQuery};
use crate::models::ReceiptRequest;
use crate::repositories::populate::{expand_receipt, expand_receipts};
use crate::repositories::{CrudRepository, ReceiptRepository};

// ==================== GET ALL RECEIPTS ====================

pub async fn get_receipts(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<OperationListQuery>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;
    let filter = query.into_inner().into_filter()?;

    let rows = ReceiptRepository.search(pool, &filter).await?;
    let receipts = expand_receipts(pool, rows).await?;

    Ok(HttpResponse::Ok().json(receipts))
}

// ==================== GET RECEIPT BY ID ====================

pub async fn get_receipt(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;

    let receipt = match ReceiptRepository.get_by_id(pool, &path.into_inner()).await? {
        Some(row) => Some(expand_receipt(pool, row).await?),
        None => None,
    };
    Ok(HttpResponse::Ok().json(receipt))
}

// ==================== CREATE RECEIPT ====================

pub async fn create_receipt(
    app_state: web::Data<Arc<AppState>>,
    receipt: web::Json<ReceiptRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Receipt", &*receipt)?;
    let pool = &app_state.db_pool;

    let row = ReceiptRepository.create(pool, &receipt).await?;
    info!(
        "📥 Created receipt {} from {} ({} line items)",
        row.reference,
        row.contact,
        receipt.products.len()
    );

    let created = expand_receipt(pool, row).await?;
    Ok(HttpResponse::Created().json(created))
}

// ==================== UPDATE RECEIPT ====================

/// Any status may follow any other.
pub async fn update_receipt(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<ReceiptRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Receipt", &*update)?;
    let pool = &app_state.db_pool;
    let receipt_id = path.into_inner();

    let updated = match ReceiptRepository.update(pool, &receipt_id, &update).await? {
        Some(row) => {
            info!("📥 Updated receipt {} -> {}", row.reference, row.status);
            Some(expand_receipt(pool, row).await?)
        }
        None => None,
    };
    Ok(HttpResponse::Ok().json(updated))
}

// ==================== DELETE RECEIPT ====================

pub async fn delete_receipt(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let receipt_id = path.into_inner();

    if ReceiptRepository.delete(&app_state.db_pool, &receipt_id).await? {
        info!("📥 Deleted receipt: {}", receipt_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use crate::configure_app;
    use crate::test_support::{post_json, test_state};

    fn receipt(contact: &str) -> Value {
        json!({
            "contact": contact,
            "scheduledDate": "2024-05-01",
            "products": []
        })
    }

    #[actix_rt::test]
    async fn test_references_are_sequential() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let first = post_json!(&app, "/api/receipts", receipt("Azure Interior")).await;
        let second = post_json!(&app, "/api/receipts", receipt("Deco Addict")).await;

        assert_eq!(first["reference"], "WH/IN/00001");
        assert_eq!(second["reference"], "WH/IN/00002");
        assert_eq!(first["from"], "vendor");
        assert_eq!(first["status"], "Draft");
        assert!(first["to"].is_null());
        assert_eq!(first["scheduledDate"], "2024-05-01T00:00:00Z");
    }

    #[actix_rt::test]
    async fn test_client_reference_is_ignored() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let mut body = receipt("Azure Interior");
        body["reference"] = json!("CUSTOM/1");
        let created = post_json!(&app, "/api/receipts", body).await;
        assert_eq!(created["reference"], "WH/IN/00001");
    }

    #[actix_rt::test]
    async fn test_receipt_expands_warehouse_and_products() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let warehouse = post_json!(
            &app,
            "/api/warehouses",
            json!({ "name": "Main", "shortCode": "WH", "address": "1 Dock Road" })
        )
        .await;
        let product = post_json!(
            &app,
            "/api/products",
            json!({
                "name": "Desk", "sku": "DESK-001", "category": "Furniture",
                "unitOfMeasure": "Units", "perUnitCost": 100
            })
        )
        .await;

        let created = post_json!(
            &app,
            "/api/receipts",
            json!({
                "from": "Azure Vendor",
                "to": warehouse["_id"],
                "contact": "Azure Interior",
                "scheduledDate": "2024-05-01T10:00:00Z",
                "status": "Ready",
                "sourceDoc": "PO-7",
                "products": [
                    { "product": product["_id"], "quantity": 5 },
                    { "product": "", "quantity": 2 }
                ]
            })
        )
        .await;

        assert_eq!(created["from"], "Azure Vendor");
        assert_eq!(created["to"], warehouse);
        assert_eq!(created["sourceDoc"], "PO-7");
        assert_eq!(created["products"][0]["product"], product);
        assert_eq!(created["products"][0]["quantity"], 5.0);
        assert!(created["products"][1]["product"].is_null());

        // Deleting the product leaves the line item behind with a null product.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/products/{}", product["_id"].as_str().unwrap()))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/receipts/{}", created["_id"].as_str().unwrap()))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["products"].as_array().unwrap().len(), 2);
        assert!(fetched["products"][0]["product"].is_null());
        assert_eq!(fetched["to"], warehouse);

        // Deleting the destination warehouse leaves the receipt readable.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/warehouses/{}", warehouse["_id"].as_str().unwrap()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/receipts/{}", created["_id"].as_str().unwrap()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Value = test::read_body_json(resp).await;
        assert_eq!(fetched["_id"], created["_id"]);
        assert!(fetched["to"].is_null());

        let req = test::TestRequest::get().uri("/api/receipts").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert!(list[0]["to"].is_null());
    }

    #[actix_rt::test]
    async fn test_update_keeps_reference_and_replaces_lines() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let mut body = receipt("Azure Interior");
        body["products"] = json!([{ "quantity": 1 }, { "quantity": 2 }]);
        let created = post_json!(&app, "/api/receipts", body).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/receipts/{}", created["_id"].as_str().unwrap()))
            .set_json(json!({
                "contact": "Azure Interior",
                "scheduledDate": "2024-05-02",
                "status": "Done",
                "reference": "WH/IN/99999",
                "products": [{ "quantity": 7 }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(resp).await;

        assert_eq!(updated["reference"], "WH/IN/00001");
        assert_eq!(updated["status"], "Done");
        assert_eq!(updated["products"], json!([{ "product": null, "quantity": 7.0 }]));
        assert_eq!(updated["createdAt"], created["createdAt"]);
    }

    #[actix_rt::test]
    async fn test_any_status_transition_is_accepted() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let created = post_json!(&app, "/api/receipts", receipt("Azure Interior")).await;
        let uri = format!("/api/receipts/{}", created["_id"].as_str().unwrap());

        for status in ["Done", "Draft", "Cancelled", "Ready", "Waiting", "Draft"] {
            let mut body = receipt("Azure Interior");
            body["status"] = json!(status);
            let req = test::TestRequest::put().uri(&uri).set_json(body).to_request();
            let updated: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(updated["status"], status);
        }
    }

    #[actix_rt::test]
    async fn test_reference_collision_after_delete() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let first = post_json!(&app, "/api/receipts", receipt("A")).await;
        post_json!(&app, "/api/receipts", receipt("B")).await;
        post_json!(&app, "/api/receipts", receipt("C")).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/receipts/{}", first["_id"].as_str().unwrap()))
            .to_request();
        test::call_service(&app, req).await;

        // Two rows left, so the next number is 3, which is still taken.
        let req = test::TestRequest::post()
            .uri("/api/receipts")
            .set_json(receipt("D"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = test::read_body_json(resp).await;
        assert!(error["error"].as_str().unwrap().contains("Duplicate key"));

        let req = test::TestRequest::get().uri("/api/receipts").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        let references: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["reference"].as_str().unwrap())
            .collect();
        assert_eq!(references, vec!["WH/IN/00002", "WH/IN/00003"]);
    }

    #[actix_rt::test]
    async fn test_search_and_status_filters() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        post_json!(&app, "/api/receipts", receipt("Azure Interior")).await;
        let mut ready = receipt("Deco Addict");
        ready["status"] = json!("Ready");
        post_json!(&app, "/api/receipts", ready).await;

        let req = test::TestRequest::get().uri("/api/receipts?search=azure").to_request();
        let found: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["contact"], "Azure Interior");

        let req = test::TestRequest::get().uri("/api/receipts?search=WH%2FIN%2F00002").to_request();
        let found: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found[0]["contact"], "Deco Addict");

        let req = test::TestRequest::get().uri("/api/receipts?status=Ready").to_request();
        let found: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["reference"], "WH/IN/00002");

        let req = test::TestRequest::get().uri("/api/receipts?status=Shipped").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_invalid_bodies_are_rejected() {
        let app = test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let cases = [
            json!({ "scheduledDate": "2024-05-01" }),
            json!({ "contact": "", "scheduledDate": "2024-05-01" }),
            json!({ "contact": "A", "scheduledDate": "someday" }),
            json!({ "contact": "A", "scheduledDate": "2024-05-01", "status": "Shipped" }),
            json!({ "contact": "A", "scheduledDate": "2024-05-01", "products": [{ "quantity": "many" }] }),
        ];

        for body in cases {
            let req = test::TestRequest::post().uri("/api/receipts").set_json(&body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            let error: Value = test::read_body_json(resp).await;
            assert!(error["error"].is_string());
        }

        let req = test::TestRequest::get().uri("/api/receipts").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert!(list.as_array().unwrap().is_empty());
    }
}
