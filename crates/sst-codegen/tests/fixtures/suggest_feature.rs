// Sample feature source, the shape a real feature crate module would have.
// Scanned by the integration test below rather than compiled as part of
// this crate.

fn setup() {
    feature!(suggest, "aim suggestion hud overlay");
    gamespecific!(l4dbased);
    require!(democlient);
    require_gamedata!(off_m_angEyeAngles);
    init!(suggest_init);
    end!(suggest_end);

    def_event!(tick);
    handle_event!(tick, suggest_on_tick);

    def_cvar!(sst_suggest_enabled);
    def_ccmd!(sst_suggest_dump);
}

fn suggest_on_tick(_simulating: &()) {}

fn democlient_setup() {
    feature!(democlient, "demo playback helpers");
    init!(democlient_init);
}
