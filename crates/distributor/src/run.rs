use {
    crate::{
        domain::{
            Distributor,
            Session,
            fee::FeeBps,
            recipient,
            session::{Import, Review},
            token::Network,
            validation::{self, StarknetFormat},
        },
        infra::{
            self,
            account::{self, Node, Wallet, jsonrpc},
            cli,
            config,
            observe,
            records,
        },
    },
    anyhow::{Context, Result, bail, ensure},
    bigdecimal::BigDecimal,
    clap::Parser,
    std::{io::Write, sync::Arc},
    tokio::io::{AsyncBufReadExt, BufReader},
};

/// Runs the binary and exits with a non-zero code on failure.
pub async fn start(args: impl IntoIterator<Item = String>) {
    let args = cli::Args::parse_from(args);
    observe::init(&args.log, args.log_json);
    tracing::info!("running distributor with {args:#?}");
    if let Err(err) = run(args, &mut std::io::stdout()).await {
        tracing::error!(?err, "distributor failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

pub async fn run(args: cli::Args, out: &mut (dyn Write + Send)) -> Result<()> {
    let config = config::file::load(&args.config).await;
    let client = reqwest::Client::new();
    let node = config
        .node_url
        .clone()
        .map(|url| Node::new(jsonrpc::Client::new(client.clone(), url)));
    let network = network(&config, node.as_ref()).await?;
    observe::network(network);

    match args.command {
        cli::Command::Validate(distribution) => {
            let session = session(&config, network, &distribution).await?;
            validate(&session, out)
        }
        cli::Command::Plan {
            distribution,
            fee_bps,
        } => {
            let mut session = session(&config, network, &distribution).await?;
            let fee = fee_bps.map(FeeBps::try_from).transpose()?;
            let distributor = distributor(&config, &client, network, node, false).await?;
            let review = distributor.preview(&mut session, fee).await?;
            summary(&review, out)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&review.plan)?)?;
            Ok(())
        }
        cli::Command::Distribute { distribution, yes } => {
            let mut session = session(&config, network, &distribution).await?;
            let distributor = distributor(&config, &client, network, node, true).await?;
            let review = distributor.review(&mut session).await?;
            summary(&review, out)?;
            if !yes && !confirm(out).await? {
                session.cancel()?;
                writeln!(out, "cancelled")?;
                return Ok(());
            }
            let submitted = distributor.submit(&mut session).await?;
            writeln!(out, "transaction: {}", submitted.hash)?;
            writeln!(out, "explorer: {}", submitted.url)?;
            submitted.record_written().await;
            Ok(())
        }
    }
}

/// Connects the collaborators of a [`Distributor`]. A wallet is only
/// connected when the distribution is going to be submitted.
async fn distributor(
    config: &infra::Config,
    client: &reqwest::Client,
    network: Network,
    node: Option<Node>,
    submit: bool,
) -> Result<Distributor> {
    let node = node.context("node-url must be configured")?;
    let wallet = match (submit, &config.wallet_url) {
        (false, _) => None,
        (true, None) => bail!("wallet-url must be configured"),
        (true, Some(url)) => Some(Wallet::new(jsonrpc::Client::new(
            client.clone(),
            url.clone(),
        ))),
    };
    let account = account::Rpc::connect(node, wallet, config.confirmation)
        .await
        .context("failed to connect to the wallet")?;
    let records: Arc<dyn infra::RecordStore> = match &config.records_url {
        Some(url) => Arc::new(
            records::Api::new(client.clone(), url.clone()).context("invalid records-url")?,
        ),
        None => Arc::new(records::Disabled),
    };
    let contract = config
        .contracts
        .get(network)
        .with_context(|| format!("no distribution contract configured for {network}"))?;
    Ok(Distributor::new(
        Arc::new(account),
        records,
        Arc::new(StarknetFormat),
        network,
        contract,
    ))
}

/// Determines the network from the node's chain ID, falling back to the
/// configured network when no node is configured.
async fn network(config: &infra::Config, node: Option<&Node>) -> Result<Network> {
    let Some(node) = node else {
        return config
            .network
            .context("network must be configured when no node-url is");
    };
    let chain_id = node.chain_id().await.context("failed to fetch chain ID")?;
    let network = Network::from_chain_id(chain_id)
        .with_context(|| format!("unsupported chain ID {chain_id}"))?;
    if let Some(configured) = config.network {
        ensure!(
            configured == network,
            "configured network {configured} does not match the node's network {network}"
        );
    }
    Ok(network)
}

async fn session(
    config: &infra::Config,
    network: Network,
    args: &cli::Distribution,
) -> Result<Session> {
    let tokens = config.tokens(network);
    let token = match &args.token {
        Some(symbol) => Some(
            tokens
                .get(symbol)
                .with_context(|| format!("token {symbol} is not supported on {network}"))?
                .clone(),
        ),
        None => tokens.default_token().cloned(),
    };
    let mut session = Session::new(token);
    session.set_mode(args.mode.into())?;
    if let Some(amount) = &args.equal_amount {
        session.set_equal_amount(amount.clone())?;
    }

    let rows = tokio::fs::read_to_string(&args.recipients)
        .await
        .with_context(|| format!("failed to read {:?}", args.recipients))?;
    session.import(recipient::parse_rows(&rows), Import::Replace)?;

    if let Some(lump_sum) = &args.lump_sum {
        let amount = session.split_lump_sum(lump_sum)?;
        tracing::info!(%amount, "split lump sum between recipients");
    }
    Ok(session)
}

fn validate(session: &Session, out: &mut (dyn Write + Send)) -> Result<()> {
    let token = session.token().context("no token selected")?;
    ensure!(!session.recipients().is_empty(), "recipient list is empty");
    match validation::validate(session.recipients(), session.mode(), token, &StarknetFormat) {
        Ok(()) => {
            writeln!(out, "ok")?;
            Ok(())
        }
        Err(report) => {
            for problem in report.problems() {
                writeln!(out, "{problem}")?;
            }
            bail!("found {} problem(s)", report.problems().len())
        }
    }
}

fn summary(review: &Review, out: &mut (dyn Write + Send)) -> Result<()> {
    let amounts = review.totals.rounded(&review.token);
    let symbol = &review.token.symbol;
    let percent = BigDecimal::new(review.fee.get().into(), 2).normalized();
    writeln!(out, "token: {symbol}")?;
    writeln!(out, "mode: {}", review.mode)?;
    writeln!(out, "recipients: {}", review.recipients.len())?;
    writeln!(out, "amount: {} {symbol}", amounts.base)?;
    writeln!(out, "protocol fee ({percent}%): {} {symbol}", amounts.fee)?;
    writeln!(out, "total: {} {symbol}", amounts.total)?;
    Ok(())
}

async fn confirm(out: &mut (dyn Write + Send)) -> Result<bool> {
    write!(out, "submit distribution? [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
