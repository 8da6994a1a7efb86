//! End-to-end HTTP behaviour of the order, customer and item endpoints over
//! the in-memory adapters.

mod support_http;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use support_http::{mobile_payload, order_payload, test_app};

fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

#[rstest]
#[actix_web::test]
async fn mobile_orders_reuse_the_customer_by_phone() {
    let app = test::init_service(test_app()).await;

    let first = test::TestRequest::post()
        .uri("/api/pedidos/mobile")
        .set_json(mobile_payload("Ana", "11 99999-0000", "Rua A", &[("FILE", 1)]))
        .to_request();
    let resp = test::call_service(&app, first).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let second = test::TestRequest::post()
        .uri("/api/pedidos/mobile")
        .set_json(mobile_payload(
            "Ana Souza",
            "11 99999-0000",
            "Rua B",
            &[("TIRAS", 2)],
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, second).await;
    assert_eq!(body["customer"]["name"], "Ana Souza");
    assert_eq!(body["customer"]["address"], "Rua B");
    assert_eq!(body["total"], json!(49.8));

    let customers: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/clientes").to_request(),
    )
    .await;
    let customers = customers.as_array().cloned().unwrap_or_default();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["phone"], "11 99999-0000");
}

#[rstest]
#[actix_web::test]
async fn reconciliation_merges_items_by_product() {
    let app = test::init_service(test_app()).await;

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/pedidos")
            .set_json(order_payload("Bruno", "222", &[("FILE", 2), ("TIRAS", 1)], 5.0))
            .to_request(),
    )
    .await;
    let id = created["id"].as_i64().unwrap_or_default();
    assert_eq!(created["total"], json!(137.7));
    let file_item_id = created["items"]
        .as_array()
        .and_then(|items| items.iter().find(|item| item["product"] == "FILE"))
        .map(|item| item["id"].clone())
        .unwrap_or(Value::Null);

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/pedidos/{id}"))
            .set_json(order_payload(
                "Bruno",
                "222",
                &[("FILE", 3), ("TIRAS", 0), ("TEMPERO", 2)],
                5.0,
            ))
            .to_request(),
    )
    .await;

    let items = updated["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    let file = items
        .iter()
        .find(|item| item["product"] == "FILE")
        .cloned()
        .unwrap_or(Value::Null);
    assert_eq!(file["id"], file_item_id, "matched item keeps its id");
    assert_eq!(file["quantity"], 3);
    assert!(items.iter().all(|item| item["product"] != "TIRAS"));
    assert!((as_f64(&updated["total"]) - 172.7).abs() < 1e-9);
}

#[rstest]
#[actix_web::test]
async fn reconciling_unknown_order_is_not_found() {
    let app = test::init_service(test_app()).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/pedidos/999")
            .set_json(order_payload("Bruno", "222", &[("FILE", 1)], 0.0))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn search_filters_by_customer_and_product() {
    let app = test::init_service(test_app()).await;
    for (name, phone, items) in [
        ("Carla Dias", "333", vec![("FILE", 1)]),
        ("Davi Lima", "444", vec![("TEMPERO", 4)]),
        ("carla mendes", "555", vec![("TEMPERO", 1), ("COMBO", 1)]),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/pedidos")
                .set_json(order_payload(name, phone, &items, 0.0))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let by_name: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/pedidos/buscar?cliente=CARLA")
            .to_request(),
    )
    .await;
    assert_eq!(by_name.as_array().map(Vec::len), Some(2));

    let by_product: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/pedidos/buscar?cliente=carla&produto=TEMPERO")
            .to_request(),
    )
    .await;
    let rows = by_product.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["customerName"], "carla mendes");
    assert!(rows[0]["items"].is_array());
}

#[rstest]
#[actix_web::test]
async fn malformed_search_date_is_rejected() {
    let app = test::init_service(test_app()).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/pedidos/buscar?inicio=ontem&fim=2024-01-01T00:00:00")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case::price_beyond_storage(json!(1.0e28), 10, "unitPrice", "out_of_range")]
#[case::fractional_cents(json!(0.335), 1, "unitPrice", "too_precise")]
#[case::quantity_beyond_storage(json!(1.0), 3_000_000_000, "quantity", "out_of_range")]
#[case::total_beyond_storage(json!(9_999_999.99), 2_000, "total", "too_large")]
#[actix_web::test]
async fn unstorable_amounts_are_rejected(
    #[case] unit_price: Value,
    #[case] quantity: i64,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = test::init_service(test_app()).await;
    let mut payload = mobile_payload("Ana", "11 98888-0000", "Rua A", &[]);
    payload["items"] = json!([{ "product": "FILE", "quantity": quantity, "unitPrice": unit_price }]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/pedidos/mobile")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);

    let orders: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/pedidos").to_request(),
    )
    .await;
    assert_eq!(orders.as_array().map(Vec::len), Some(0));
}

#[rstest]
#[actix_web::test]
async fn customer_phone_must_be_unique() {
    let app = test::init_service(test_app()).await;
    let payload = json!({ "nome": "Eva", "telefone": "777", "endereco": "Rua C" });

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/clientes")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/clientes")
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], "duplicate_phone");
}

#[rstest]
#[actix_web::test]
async fn deleting_a_customer_keeps_its_orders() {
    let app = test::init_service(test_app()).await;
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/pedidos")
            .set_json(order_payload("Fabi", "888", &[("COMBO", 1)], 0.0))
            .to_request(),
    )
    .await;
    let order_id = created["id"].as_i64().unwrap_or_default();
    let customer_id = created["customer"]["id"].as_i64().unwrap_or_default();

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/clientes/{customer_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/pedidos/{order_id}"))
            .to_request(),
    )
    .await;
    assert!(order["customer"].is_null());
    assert_eq!(order["total"], json!(51.9));
}

#[rstest]
#[actix_web::test]
async fn item_sub_resource_updates_parent_total() {
    let app = test::init_service(test_app()).await;
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/pedidos")
            .set_json(order_payload("Gui", "999", &[("FILE", 1)], 2.0))
            .to_request(),
    )
    .await;
    let order_id = created["id"].as_i64().unwrap_or_default();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/itens")
            .set_json(json!({ "pedidoId": order_id, "produto": "TEMPERO", "quantidade": 3 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let duplicate = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/itens")
            .set_json(json!({ "pedidoId": order_id, "produto": "FILE", "quantidade": 1 }))
            .to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let order: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/pedidos/{order_id}"))
            .to_request(),
    )
    .await;
    assert!((as_f64(&order["total"]) - 64.9).abs() < 1e-9);
}

#[rstest]
#[actix_web::test]
async fn details_grid_lists_whole_catalog() {
    let app = test::init_service(test_app()).await;
    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/pedidos")
            .set_json(order_payload("Hana", "123", &[("ESPALMADA", 1)], 0.0))
            .to_request(),
    )
    .await;
    let order_id = created["id"].as_i64().unwrap_or_default();

    let details: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/pedidos/{order_id}/detalhes"))
            .to_request(),
    )
    .await;
    assert_eq!(details["items"].as_array().map(Vec::len), Some(8));
}
