//! # Taskboard Seed Tool
//!
//! Wipes the database named by `DATABASE_URL` and loads a small demo
//! dataset: two users (password `password123`), three projects for
//! `demo_user` and five tasks.
//!
//! ```bash
//! cargo run -p taskboard-api --bin taskboard-seed
//! ```

use chrono::{Duration, Utc};
use taskboard_shared::{
    auth::password::hash_password,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    models::{
        project::{CreateProject, Project, ProjectStatus},
        task::{CreateTask, Task, TaskPriority, TaskStatus},
        user::{CreateUser, User},
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_PASSWORD: &str = "password123";

struct SeedTask {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    due_in_days: i64,
}

struct SeedProject {
    name: &'static str,
    description: &'static str,
    status: ProjectStatus,
    tasks: &'static [SeedTask],
}

const PROJECTS: &[SeedProject] = &[
    SeedProject {
        name: "Website Redesign",
        description: "Redesign company website with modern UI/UX",
        status: ProjectStatus::Active,
        tasks: &[
            SeedTask {
                title: "Design homepage mockup",
                description: "Create high-fidelity mockup for the new homepage",
                status: TaskStatus::Completed,
                priority: TaskPriority::High,
                due_in_days: -5,
            },
            SeedTask {
                title: "Implement navigation menu",
                description: "Build responsive navigation with dropdown menus",
                status: TaskStatus::InProgress,
                priority: TaskPriority::High,
                due_in_days: 3,
            },
        ],
    },
    SeedProject {
        name: "Mobile App Development",
        description: "Build a mobile app for iOS and Android",
        status: ProjectStatus::Active,
        tasks: &[
            SeedTask {
                title: "Set up database schema",
                description: "Design and implement the database structure",
                status: TaskStatus::Todo,
                priority: TaskPriority::Medium,
                due_in_days: 7,
            },
            SeedTask {
                title: "Create user authentication",
                description: "Implement login and signup functionality",
                status: TaskStatus::Todo,
                priority: TaskPriority::High,
                due_in_days: 10,
            },
        ],
    },
    SeedProject {
        name: "Marketing Campaign",
        description: "Q4 marketing campaign for product launch",
        status: ProjectStatus::Completed,
        tasks: &[SeedTask {
            title: "Write blog posts",
            description: "Create 5 blog posts for campaign",
            status: TaskStatus::Completed,
            priority: TaskPriority::Medium,
            due_in_days: -15,
        }],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_seed=info,taskboard_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://taskboard.db".to_string());

    let pool = create_pool(DatabaseConfig {
        url,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let mut tx = pool.begin().await?;

    tracing::info!("Clearing database...");
    // Projects and tasks go with their users
    sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

    tracing::info!("Creating users...");
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let demo = User::create(
        &mut *tx,
        CreateUser {
            username: "demo_user".to_string(),
            email: "demo@tricab.com".to_string(),
            password_hash: password_hash.clone(),
        },
    )
    .await?;
    User::create(
        &mut *tx,
        CreateUser {
            username: "john_doe".to_string(),
            email: "john@example.com".to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!("Creating projects and tasks...");
    let now = Utc::now();
    for seed in PROJECTS {
        let project = Project::create(
            &mut *tx,
            CreateProject {
                user_id: demo.id,
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                status: seed.status,
            },
        )
        .await?;

        for task in seed.tasks {
            Task::create(
                &mut *tx,
                CreateTask {
                    project_id: project.id,
                    title: task.title.to_string(),
                    description: Some(task.description.to_string()),
                    status: task.status,
                    priority: task.priority,
                    due_date: Some(now + Duration::days(task.due_in_days)),
                },
            )
            .await?;
        }
    }

    tx.commit().await?;
    close_pool(pool).await;

    tracing::info!(
        "Database seeded. Demo credentials: username='demo_user', password='{}'",
        DEMO_PASSWORD
    );

    Ok(())
}
