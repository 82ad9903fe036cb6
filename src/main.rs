use api::{App, HttpFetcher, Wiki};
use core::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
    pin::pin,
    time::Duration,
};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{env, sync::Arc};
use tokio::{net::TcpListener, runtime::Runtime, time};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port = match env::var("PORT") {
        Ok(port) => port.parse()?,
        _ => 3000,
    };
    let lang = env::var("WIKI_LANG").unwrap_or_else(|_| String::from("pt"));
    let pg_port = match env::var("PG_PORT") {
        Ok(port) => port.parse()?,
        _ => 5432,
    };
    let user = env::var("PG_USERNAME")?;
    let pass = env::var("PG_PASSWORD")?;
    let host = env::var("PG_HOSTNAME")?;
    let data = env::var("PG_DATABASE")?;

    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        // Connect to the database
        let (client, conn) = db::Config::new()
            .user(&user)
            .password(&pass)
            .host(&host)
            .dbname(&data)
            .port(pg_port)
            .connect(db::NoTls)
            .await?;
        let db_handle = tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::error!("database connection terminated: {err}");
            }
        });
        let db = db::Database::from(client);
        db.migrate().await.map_err(|err| anyhow::anyhow!("cannot apply schema: {err}"))?;
        log::info!("connected to database {data} at {host}:{pg_port}");

        // Initialize service handler
        let wiki = Wiki::new(HttpFetcher::new()?, &lang);
        let app = Arc::new(App::new(wiki, db));

        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(addr).await?;
        log::info!("listening on http://{addr} (Wikipedia language: {lang})");

        let mut stop = pin!(tokio::signal::ctrl_c());
        loop {
            let (stream, peer) = tokio::select! {
                biased;
                result = &mut stop => {
                    result?;
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        log::error!("cannot accept connection: {err}");
                        continue;
                    }
                },
            };

            let app = app.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let app = app.clone();
                    async move { Ok::<_, Infallible>(app.respond(req).await) }
                });
                if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                    log::warn!("connection with {peer} failed: {err}");
                }
            });
        }

        // Closing the last client handle ends the connection task
        log::info!("shutting down");
        drop(app);
        if time::timeout(Duration::from_secs(5), db_handle).await.is_err() {
            log::warn!("database connection still busy with in-flight requests");
        }

        anyhow::Ok(())
    })
}
