//! Pages served through the content layout, and live reload.

use std::time::Duration;

use uploads_gateway::config::{FooterConfig, FooterLinkConfig, GatewayConfig, PageConfig};

mod common;

fn page(path: &str, title: &str, body: &str) -> PageConfig {
    PageConfig {
        path: path.into(),
        title: title.into(),
        body: Some(body.into()),
        file: None,
    }
}

fn assert_footer_is_last(html: &str) {
    let footer_start = html.rfind("<footer class=\"site-footer\">").expect("footer present");
    let main_end = html.rfind("</main>").expect("main present");
    assert!(main_end < footer_start, "footer must follow the content");
    let after = &html[html.rfind("</footer>").unwrap()..];
    assert!(after.starts_with("</footer></div>\n</body>"), "got {after:?}");
}

#[tokio::test]
async fn test_pages_render_with_footer() {
    let mut config = GatewayConfig::default();
    config.footer = FooterConfig {
        text: "© ftronlie".into(),
        links: vec![FooterLinkConfig {
            label: "Uploads".into(),
            href: "/uploads/".into(),
        }],
    };
    config.pages.push(page("/", "Home", "<h1>Welcome</h1>"));
    config.pages.push(page("/empty", "Empty", ""));
    let (gateway, shutdown, _) = common::start_gateway(config).await;
    let client = common::client();

    let res = client.get(format!("http://{gateway}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains("<a href=\"/uploads/\">Uploads</a>"));
    assert_footer_is_last(&html);

    let res = client.get(format!("http://{gateway}/empty")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("<main class=\"layout-content\"></main>"));
    assert_footer_is_last(&html);

    shutdown.trigger();
}

#[tokio::test]
async fn test_not_found_page_uses_layout() {
    let (gateway, shutdown, _) = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .get(format!("http://{gateway}/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_footer_is_last(&res.text().await.unwrap());

    shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_is_applied() {
    let (gateway, shutdown, updates) = common::start_gateway(GatewayConfig::default()).await;
    let client = common::client();
    let url = format!("http://{gateway}/fresh");

    assert_eq!(client.get(&url).send().await.unwrap().status(), 404);

    let mut config = GatewayConfig::default();
    config.pages.push(page("/fresh", "Fresh", "<p>new</p>"));
    updates.send(config).unwrap();

    let mut status = 0;
    for _ in 0..50 {
        status = client.get(&url).send().await.unwrap().status().as_u16();
        if status == 200 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(status, 200);

    shutdown.trigger();
}
