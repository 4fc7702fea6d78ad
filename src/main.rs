use dotenvy::dotenv;

use oqim_api::cli;
use oqim_api::logging::init_tracing;
use oqim_api::router::init_router;
use oqim_api::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-superadmin" {
        handle_create_superadmin(args).await;
        return;
    }

    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_superadmin(args: Vec<String>) {
    if args.len() != 6 {
        eprintln!(
            "Usage: {} create-superadmin <first_name> <last_name> <phone> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let first_name = &args[2];
    let last_name = &args[3];
    let phone = &args[4];
    let password = &args[5];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    match cli::create_super_admin(&pool, first_name, last_name, phone, password).await {
        Ok(_) => {
            println!("✅ Superadmin created successfully!");
            println!("   Phone: {}", phone);
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("❌ Error creating superadmin: {}", e);
            std::process::exit(1);
        }
    }
}
