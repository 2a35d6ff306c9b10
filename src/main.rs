use core::time::Duration;
use engine::{memory::MemoryCache, Config, Lobby};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port = env::var("PORT")?.parse()?;
    let mut config = match env::var("GAME_MODE") {
        Ok(mode) => mode.parse::<Config>()?,
        _ => Config::default(),
    };
    if let Ok(delay) = env::var("FEEDBACK_DELAY_MS") {
        config.feedback_delay = Duration::from_millis(delay.parse()?);
    }

    let pg_port = match env::var("PG_PORT") {
        Ok(port) => port.parse()?,
        _ => 5432,
    };
    let mut pg = db::Config::new();
    pg.user(&env::var("PG_USERNAME")?)
        .password(env::var("PG_PASSWORD")?)
        .host(&env::var("PG_HOSTNAME")?)
        .port(pg_port)
        .dbname(&env::var("PG_DATABASE")?);

    let runtime = Runtime::new()?;
    let (listener, lobby) = runtime.block_on(async {
        let (client, conn) = pg.connect(db::NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::error!("database connection closed: {err}");
            }
        });

        let database = Arc::new(db::Database::from(client));
        database.migrate().await?;
        log::info!("running in {:?} mode", config.mode);

        let lobby = Lobby::new(database.clone(), database, Arc::new(MemoryCache::default()), config);
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(addr).await?;
        log::info!("listening on {addr}");
        anyhow::Ok((listener, lobby))
    })?;

    runtime.block_on(async move {
        let mut stop = core::pin::pin!(tokio::signal::ctrl_c());
        loop {
            let (stream, peer) = tokio::select! {
                biased;
                res = &mut stop => {
                    res?;
                    log::info!("shutting down");
                    break;
                }
                conn = listener.accept() => conn?,
            };

            let lobby = lobby.clone();
            let service = service_fn(move |req| {
                let lobby = lobby.clone();
                async move { Ok::<_, Infallible>(api::respond(req, &lobby).await) }
            });

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    log::error!("connection with {peer} failed: {err}");
                }
            });
        }
        anyhow::Ok(())
    })
}
