//! Built-in genre presets and the conflicting-tag advisory map.
//!
//! Presets are one-click starting points: selecting one fills the input
//! line with a request the assistant expands into a full engineered prompt.
//! The conflict map flags mutually exclusive style tokens (e.g. "lo-fi"
//! alongside "clean mix") before a prompt is sent; the check is advisory
//! and never blocks sending.

/// A one-click genre starting point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Genre label shown in listings
    pub genre: &'static str,
    /// Short vibe description
    pub description: &'static str,
    /// The full engineered prompt this preset expands to
    pub prompt: &'static str,
}

/// Generator-mode presets
pub const PRESETS: &[Preset] = &[
    Preset {
        genre: "Detroit Trap",
        description: "Flint/Detroit style with nervous piano and off-beat flow.",
        prompt: "Detroit Trap, Flint Rap, 190 BPM, Nervous Piano Loops, Heavy 808 Glides, Off-beat Percussion, Aggressive Male Vocals, Crisp Mix, [Exclude: melodic, singing, autotune, pop structure]",
    },
    Preset {
        genre: "90s Boom Bap",
        description: "Gritty East Coast sound with vinyl texture.",
        prompt: "90s Boom Bap, East Coast Hip-Hop, 90 BPM, Sampled Jazz Piano, Vinyl Crackle, Heavy Kick Drum, Gritty Male Rap, Analog Warmth, SP-1200 Texture, [Exclude: trap hi-hats, autotune, digital sheen, modern pop]",
    },
    Preset {
        genre: "Dark UK Drill",
        description: "Sliding 808s and ominous atmosphere.",
        prompt: "UK Drill, Dark Trap, 140 BPM, Sliding 808 Bass, Rapid Hi-Hat Triplets, Snare Rimshots, Cinematic Tension, Grime Texture, Aggressive Flow, Wide Stereo Master, [Exclude: acoustic drums, happy, major key, singing]",
    },
    Preset {
        genre: "Ethereal Cloud Rap",
        description: "Hazy, reverb-heavy atmosphere.",
        prompt: "Cloud Rap, Ethereal, 130 BPM, Massive Reverb, Hazy Synth Pads, Distorted 808s, Mumbled Vocals, Wide Stereo Image, Dreamy Texture, [Exclude: dry mix, aggressive attack, boom bap drums]",
    },
    Preset {
        genre: "Jazzy Hip-Hop",
        description: "Sophisticated chords with laid-back swing.",
        prompt: "Jazz Rap, Neo-Soul, 85 BPM, Fender Rhodes, Upright Bass, Brushes on Snare, Smooth Flow, Warm Tube Saturation, Coffee Shop Vibe, [Exclude: trap drums, aggressive vocals, electronic synths, distortion]",
    },
    Preset {
        genre: "Lo-fi Hip-Hop",
        description: "Study beats with high noise floor and nostalgia.",
        prompt: "Lo-fi Hip-Hop, Chillhop, 70 BPM, Detuned Piano, Rain Ambience, Sidechained Kick, Tape Hiss, Wow and Flutter, Melancholy, [Exclude: high fidelity, bright mix, rapping, drops, aggressive transients]",
    },
    Preset {
        genre: "Conscious Hip-Hop",
        description: "Lyrical focus with soulful sampling.",
        prompt: "Conscious Hip-Hop, Soul Sample Flip, 92 BPM, Chopped Vocal Samples, Tight Snare, Deep Bassline, Storytelling Flow, 70s Soul Aesthetic, [Exclude: mumble rap, auto-tune, repetitive hook, simplistic drums]",
    },
    Preset {
        genre: "Memphis Phonk",
        description: "Dark, lo-fi 90s Memphis sound with cowbells.",
        prompt: "Memphis Rap, Phonk, 140 BPM, Cowbell Melodies, Distorted 808s, Lo-fi Cassette Tape Hiss, Chopped and Screwed Vocals, Horrorcore Atmosphere, [Exclude: clean mix, happy melodies, acoustic instruments]",
    },
    Preset {
        genre: "Neo-Soul",
        description: "Soulful, unquantized rhythms with rich harmonies.",
        prompt: "Neo-Soul, R&B, 88 BPM, Dilla Swing, Fender Rhodes, Unquantized Drums, Soulful Female Vocals, Deep Bassline, Warm Analog Mix, [Exclude: rigid quantization, trap hi-hats, edm, aggressive rap]",
    },
    Preset {
        genre: "West Coast G-Funk",
        description: "Laid back groove with high synth leads.",
        prompt: "G-Funk, West Coast Hip-Hop, 95 BPM, High-Pitched Sine Synth, Deep Moog Bassline, Funk Samples, Laid-back Flow, Gangsta Rap, Groovy, [Exclude: trap drums, dark, fast tempo, distortion]",
    },
];

/// Beef-up mode presets for enhancing an uploaded sample
pub const BEEF_UP_PRESETS: &[Preset] = &[
    Preset {
        genre: "Low End Reconstruction",
        description: "Re-synthesize sub frequencies and kick.",
        prompt: "[Task: Beef Up Low End], [Add Sub-Harmonics], [Kick Drum Replacement], [Sidechain Glue], [Mono Bass], [Exclude: mud, rumble]",
    },
    Preset {
        genre: "Transient Restoration",
        description: "Recover lost punch in drums.",
        prompt: "[Task: Transient Shaping], [Attack Boost], [Snare Crack], [Percussion Clarity], [Multi-band Compression], [Exclude: dull transients, soft clip]",
    },
    Preset {
        genre: "Stereo Field Expansion",
        description: "Widen the mix without phase issues.",
        prompt: "[Task: Stereo Widening], [Mid-Side EQ], [Haas Effect], [High-End Shine], [Spatial Depth], [Exclude: phase cancellation, hollow center]",
    },
    Preset {
        genre: "Vintage Analog Warmth",
        description: "Apply tube/tape saturation artifacts.",
        prompt: "[Task: Analog Texture], [Tape Saturation], [Tube Distortion], [Vinyl Noise Floor], [Warm EQ Curves], [Exclude: digital coldness, harsh highs]",
    },
    Preset {
        genre: "Vocal Clarity & Presence",
        description: "Bring vocals to the front of the mix.",
        prompt: "[Task: Vocal Enhancement], [De-essing], [Presence Boost 3kHz], [Optical Compression], [Plate Reverb], [Exclude: sibilance, muddy vocals]",
    },
    Preset {
        genre: "High-Fidelity Upscale",
        description: "General remastering for clarity.",
        prompt: "[Task: HD Remaster], [Exciter], [Air Band Boost], [Parallel Compression], [Limiter Maximizer], [Exclude: distortion, clipping, noise]",
    },
];

/// Style tokens that contradict each other inside one prompt
pub const CONFLICTING_TAGS: &[(&str, &[&str])] = &[
    (
        "lo-fi",
        &["high fidelity", "clean mix", "modern mix", "48khz", "24-bit"],
    ),
    (
        "high fidelity",
        &["lo-fi", "tape hiss", "vinyl crackle", "bitcrush"],
    ),
    ("clean mix", &["lo-fi", "muddy", "distortion", "noise"]),
    ("acoustic", &["synthesizer", "edm", "electronic", "808"]),
    ("electronic", &["acoustic", "unplugged", "folk"]),
    ("happy", &["sad", "melancholy", "dark", "depressive"]),
    ("dark", &["happy", "uplifting", "euphoric", "bright"]),
    ("slow", &["fast", "rapid", "up-tempo", "140 bpm", "170 bpm"]),
    ("fast", &["slow", "downtempo", "80 bpm", "60 bpm"]),
];

/// Find conflicting tag pairs present in a composed prompt
///
/// Matching is case-insensitive substring containment on the whole text.
/// Each `(anchor, conflict)` pair is reported once, in map order.
pub fn find_conflicts(text: &str) -> Vec<(&'static str, &'static str)> {
    let lower = text.to_lowercase();
    let mut hits = Vec::new();
    for (anchor, conflicts) in CONFLICTING_TAGS {
        if !lower.contains(anchor) {
            continue;
        }
        for conflict in *conflicts {
            if lower.contains(conflict) {
                hits.push((*anchor, *conflict));
            }
        }
    }
    hits
}

/// The input-line text a selected preset expands to
pub fn preset_request(preset: &Preset) -> String {
    format!(
        "I need a prompt for: {}. Vibe: {}",
        preset.genre, preset.description
    )
}
